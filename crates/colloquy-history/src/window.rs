//! Bounded-context projection over a conversation's records.

use crate::record::{CompletionTurn, MessageRecord};

/// Project `records` into at most `limit` completion turns.
///
/// Every system record is kept, in order, ahead of the most recent
/// `limit - system_count` non-system records. When system records alone
/// reach the limit, no other record is included and the result may exceed
/// `limit`.
pub fn bounded_context(records: &[MessageRecord], limit: usize) -> Vec<CompletionTurn> {
    let (system, others): (Vec<&MessageRecord>, Vec<&MessageRecord>) =
        records.iter().partition(|record| record.is_system());
    let keep = limit.saturating_sub(system.len());
    let start = others.len().saturating_sub(keep);
    system
        .into_iter()
        .chain(others[start..].iter().copied())
        .map(MessageRecord::to_completion_turn)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::bounded_context;
    use crate::record::{CompletionTurn, MessageRecord, Role};
    use pretty_assertions::assert_eq;

    fn contents(turns: &[CompletionTurn]) -> Vec<&str> {
        turns.iter().map(|turn| turn.content.as_str()).collect()
    }

    fn conversation(len: usize) -> Vec<MessageRecord> {
        let mut records = vec![MessageRecord::system("persona")];
        for idx in 0..len {
            if idx % 2 == 0 {
                records.push(MessageRecord::user(format!("q{idx}")));
            } else {
                records.push(MessageRecord::assistant(format!("a{idx}")));
            }
        }
        records
    }

    #[test]
    fn empty_input_projects_to_nothing() {
        assert!(bounded_context(&[], 10).is_empty());
    }

    #[test]
    fn keeps_system_and_most_recent_tail() {
        let records = conversation(6);
        let turns = bounded_context(&records, 3);
        assert_eq!(contents(&turns), vec!["persona", "q4", "a5"]);
        assert_eq!(turns[0].role, Role::System);
    }

    #[test]
    fn short_conversation_is_returned_whole() {
        let records = conversation(2);
        let turns = bounded_context(&records, 10);
        assert_eq!(contents(&turns), vec!["persona", "q0", "a1"]);
    }

    #[test]
    fn system_records_are_hoisted_in_order() {
        let records = vec![
            MessageRecord::user("early"),
            MessageRecord::system("first"),
            MessageRecord::assistant("middle"),
            MessageRecord::system("second"),
            MessageRecord::user("late"),
        ];
        let turns = bounded_context(&records, 3);
        assert_eq!(contents(&turns), vec!["first", "second", "late"]);
    }

    #[test]
    fn system_count_at_or_above_limit_drops_all_others() {
        let records = vec![
            MessageRecord::system("a"),
            MessageRecord::system("b"),
            MessageRecord::user("dropped"),
        ];
        assert_eq!(contents(&bounded_context(&records, 2)), vec!["a", "b"]);
        assert_eq!(contents(&bounded_context(&records, 1)), vec!["a", "b"]);
        assert_eq!(contents(&bounded_context(&records, 0)), vec!["a", "b"]);
    }

    #[test]
    fn length_law_holds_across_limits() {
        let records = conversation(7);
        let system_count = 1;
        let others = records.len() - system_count;
        for limit in 0..12 {
            let turns = bounded_context(&records, limit);
            let expected_tail = others.min(limit.saturating_sub(system_count));
            assert_eq!(turns.len(), system_count + expected_tail, "limit={limit}");
            assert_eq!(turns[0].content, "persona");
        }
    }
}
