//! The conditional rule compiler.
//!
//! Converts free-form restriction conditionals
//! (`"no_left_turn @ (Mo-Fr 06:00-10:00); yes @ (Sa,Su)"`) and
//! opening-hours values (`"Mo-Fr 08:00-16:00; Sa 09:00-16:00"`) into a
//! nested mapping from action to weekday to time windows.
//!
//! The grammar here is deliberately narrow: it recognizes the conventions
//! observed in the input corpus and falls back to identity buckets for
//! anything else rather than rejecting it.

use std::collections::BTreeMap;

use osmw_model::{ClauseRules, TagValue};
use tracing::trace;

use crate::vocab;

/// Time window applied when a day spec carries no time spec.
pub const FULL_DAY_WINDOW: &str = "00:00-24:00";

/// The `24/7` shorthand, rewritten to this range token before compilation.
pub const FULL_WEEK_RANGE: &str = "mo-su";

/// Which clause-splitting convention a conditional value follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalStyle {
    /// `opening_hours` values: clauses split on `;`, each implicitly
    /// prefixed with `yes @ `.
    OpeningHours,
    /// Restriction-style values: parenthesized clauses split on `);`.
    Restriction,
}

/// Compile a conditional value into its structured form.
///
/// When the whole conditional consists of exactly one clause with no
/// day/time condition, the result degenerates to the bare action string
/// instead of a nested mapping. This mirrors the original output contract
/// and is load-bearing for downstream consumers.
pub fn compile_conditional(raw: &str, style: ConditionalStyle) -> TagValue {
    let cleaned = prepare(raw);
    let clauses: Vec<&str> = match style {
        ConditionalStyle::OpeningHours => cleaned.split(';').collect(),
        ConditionalStyle::Restriction => cleaned.split(");").collect(),
    };
    let single_clause = clauses.len() == 1;

    let mut rules: BTreeMap<String, ClauseRules> = BTreeMap::new();
    for clause in clauses {
        let prefixed;
        let clause = match style {
            ConditionalStyle::OpeningHours => {
                prefixed = format!("yes @ {clause}");
                prefixed.as_str()
            }
            ConditionalStyle::Restriction => clause,
        };

        let stripped = strip_parens(clause);
        // Only the segment between the first and second @ is the condition;
        // anything after a second @ is discarded.
        let mut parts = stripped.split('@');
        let action = strip_parens(parts.next().unwrap_or_default());
        let condition = parts.next().map(|rest| strip_parens(rest));

        match condition {
            Some(condition) => {
                // Repeated action keys across clauses accumulate into the
                // same window map.
                let mut windows = match rules.remove(&action) {
                    Some(ClauseRules::Windows(existing)) => existing,
                    _ => BTreeMap::new(),
                };
                compile_condition(&condition, &mut windows);
                rules.insert(action, ClauseRules::Windows(windows));
            }
            None if single_clause => {
                trace!(action = %action, "single irreducible clause, degenerating to scalar");
                return TagValue::Text(action);
            }
            None => {
                rules.insert(action.clone(), ClauseRules::Text(action));
            }
        }
    }
    TagValue::Rules(rules)
}

/// Compile one clause's day/time condition into `windows`, accumulating
/// into any windows already present.
fn compile_condition(condition: &str, windows: &mut BTreeMap<String, Vec<String>>) {
    for sub_clause in condition.split(';') {
        let trimmed = sub_clause.trim();
        let mut parts = trimmed.splitn(2, ' ');
        let day_spec = strip_parens(parts.next().unwrap_or_default());
        let time_spec = parts.next().map(|rest| strip_parens(rest));
        apply_sub_clause(&day_spec, time_spec.as_deref(), sub_clause, windows);
    }
}

fn apply_sub_clause(
    day_spec: &str,
    time_spec: Option<&str>,
    raw_sub_clause: &str,
    windows: &mut BTreeMap<String, Vec<String>>,
) {
    // Range token first, then fall back to a comma-separated literal list.
    let day_codes: Vec<String> = match vocab::weekday_range(day_spec) {
        Some(codes) => codes.iter().map(|code| (*code).to_string()).collect(),
        None => day_spec.split(',').map(str::to_string).collect(),
    };

    let mut time_windows: Option<Vec<String>> =
        time_spec.map(|spec| spec.split(',').map(str::to_string).collect());

    for code in &day_codes {
        match vocab::weekday_name(code) {
            Some(day) => {
                let resolved = match &time_windows {
                    Some(values) if !values.is_empty() => values.clone(),
                    _ => vec![FULL_DAY_WINDOW.to_string()],
                };
                windows.entry(day.to_string()).or_default().extend(resolved);
            }
            None => {
                // Unparseable fragment: the whole raw sub-clause becomes the
                // bucket key and the time spec is dropped, including for any
                // remaining codes of this sub-clause.
                trace!(fragment = raw_sub_clause, "unrecognized day code");
                time_windows = None;
                windows.entry(raw_sub_clause.to_string()).or_default();
            }
        }
    }
}

/// Undo XML entity escapes, tighten spacing around `,` and `-`, and
/// lowercase, so the splitting rules see a canonical form.
fn prepare(raw: &str) -> String {
    raw.replace("&lt;=", " <= ")
        .replace("&gt;=", " >= ")
        .replace("&lt;", " < ")
        .replace("&gt;", " > ")
        .replace("&quot;", "\"")
        .replace(", ", ",")
        .replace(" ,", ",")
        .replace("- ", "-")
        .replace(" -", "-")
        .to_lowercase()
}

fn strip_parens(value: &str) -> String {
    value.trim().replace(['(', ')'], "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windows_of<'a>(value: &'a TagValue, action: &str) -> &'a BTreeMap<String, Vec<String>> {
        let TagValue::Rules(rules) = value else {
            panic!("expected rules, got {value:?}");
        };
        let Some(ClauseRules::Windows(windows)) = rules.get(action) else {
            panic!("expected windows for {action}, got {rules:?}");
        };
        windows
    }

    #[test]
    fn opening_hours_expands_ranges_per_day() {
        let value = compile_conditional(
            "Mo-Fr 08:00-16:00; Sa 09:00-16:00",
            ConditionalStyle::OpeningHours,
        );
        let windows = windows_of(&value, "yes");
        for day in ["monday", "tuesday", "wednesday", "thursday", "friday"] {
            assert_eq!(windows[day], vec!["08:00-16:00".to_string()], "{day}");
        }
        assert_eq!(windows["saturday"], vec!["09:00-16:00".to_string()]);
        assert!(!windows.contains_key("sunday"));
    }

    #[test]
    fn restriction_clauses_split_on_closing_paren() {
        let value = compile_conditional(
            "no_left_turn @ (Mo-Fr 06:00-10:00,15:00-19:00); yes @ (Sa,Su)",
            ConditionalStyle::Restriction,
        );
        let turns = windows_of(&value, "no_left_turn");
        assert_eq!(
            turns["monday"],
            vec!["06:00-10:00".to_string(), "15:00-19:00".to_string()]
        );
        let open = windows_of(&value, "yes");
        assert_eq!(open["saturday"], vec![FULL_DAY_WINDOW.to_string()]);
        assert_eq!(open["sunday"], vec![FULL_DAY_WINDOW.to_string()]);
    }

    #[test]
    fn full_week_shorthand_compiles_like_its_range_token() {
        // The record builder rewrites 24/7 to mo-su before compiling; both
        // spellings must come out identical.
        let rewritten = compile_conditional(FULL_WEEK_RANGE, ConditionalStyle::Restriction);
        let direct = compile_conditional("mo-su", ConditionalStyle::Restriction);
        assert_eq!(rewritten, direct);
    }

    #[test]
    fn single_irreducible_clause_degenerates_to_scalar() {
        let value = compile_conditional("mo-su", ConditionalStyle::Restriction);
        assert_eq!(value, TagValue::Text("mo-su".to_string()));
    }

    #[test]
    fn multi_clause_irreducible_falls_back_to_identity() {
        let value = compile_conditional(
            "yes @ (axles=2 AND weight&lt;40 st); permissive",
            ConditionalStyle::Restriction,
        );
        let TagValue::Rules(rules) = &value else {
            panic!("expected rules");
        };
        assert_eq!(
            rules.get("permissive"),
            Some(&ClauseRules::Text("permissive".to_string()))
        );
    }

    #[test]
    fn repeated_action_keys_accumulate_windows() {
        let value = compile_conditional(
            "no_left_turn @ (Mo-Fr 06:00-10:00); no_left_turn @ (Mo-Sa 15:00-19:00)",
            ConditionalStyle::Restriction,
        );
        let turns = windows_of(&value, "no_left_turn");
        assert_eq!(
            turns["monday"],
            vec!["06:00-10:00".to_string(), "15:00-19:00".to_string()]
        );
        assert_eq!(turns["saturday"], vec!["15:00-19:00".to_string()]);
    }

    #[test]
    fn repeated_days_within_one_clause_accumulate() {
        let value = compile_conditional(
            "Mo-Fr 08:00-16:00, 17:00-23:00; Mo-Fr 19:00-23:00",
            ConditionalStyle::OpeningHours,
        );
        // Both clauses compile under the implicit "yes" action.
        let windows = windows_of(&value, "yes");
        assert_eq!(
            windows["monday"],
            vec![
                "08:00-16:00".to_string(),
                "17:00-23:00".to_string(),
                "19:00-23:00".to_string()
            ]
        );
    }

    #[test]
    fn unknown_day_code_buckets_raw_sub_clause() {
        let value = compile_conditional("SH off; Sa 10:00-14:00", ConditionalStyle::OpeningHours);
        let windows = windows_of(&value, "yes");
        assert_eq!(windows["sh off"], Vec::<String>::new());
        assert_eq!(windows["saturday"], vec!["10:00-14:00".to_string()]);
    }

    #[test]
    fn unknown_code_drops_time_spec_for_rest_of_sub_clause() {
        // xx poisons the remaining codes of the same sub-clause: fr then
        // defaults to the full-day window instead of the given times.
        let value = compile_conditional("xx,fr 10:00-12:00", ConditionalStyle::OpeningHours);
        let windows = windows_of(&value, "yes");
        assert_eq!(windows["friday"], vec![FULL_DAY_WINDOW.to_string()]);
        assert!(windows.contains_key("xx,fr 10:00-12:00"));
    }

    #[test]
    fn second_at_sign_ends_the_condition() {
        let value = compile_conditional("yes @ (Sa) @ ignored", ConditionalStyle::Restriction);
        let windows = windows_of(&value, "yes");
        assert_eq!(windows["saturday"], vec![FULL_DAY_WINDOW.to_string()]);
        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn entity_escapes_are_unfolded_before_splitting() {
        let value = compile_conditional(
            "yes @ (axles=2 AND weight&lt;40 st); yes @ (axles&gt;=5)",
            ConditionalStyle::Restriction,
        );
        let windows = windows_of(&value, "yes");
        // Neither clause parses as weekday rules; both land in fallback
        // buckets with the entities already unfolded.
        assert!(windows.keys().all(|key| !key.contains("&lt;")));
    }

    #[test]
    fn identical_input_compiles_identically() {
        let raw = "Mo-Th 12:00-02:00; Fr 12:00-04:00; Sa, Su 11:30-04:00";
        let first = compile_conditional(raw, ConditionalStyle::OpeningHours);
        let second = compile_conditional(raw, ConditionalStyle::OpeningHours);
        assert_eq!(first, second);
    }
}
