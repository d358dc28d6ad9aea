//! Overlap resolution between recognizer results

use crate::domain::EntitySpan;
use std::cmp::Ordering;

/// Precedence used when two candidates overlap
///
/// Higher score wins, then the longer span, then the earlier start. The
/// remaining keys only make the order total so results are reproducible.
fn precedence(a: &EntitySpan, b: &EntitySpan) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.len().cmp(&a.len()))
        .then_with(|| a.start.cmp(&b.start))
        .then_with(|| a.entity_type.cmp(&b.entity_type))
        .then_with(|| a.recognizer.cmp(&b.recognizer))
        .then_with(|| a.end.cmp(&b.end))
}

/// Reduce candidates to a non-overlapping set
///
/// Candidates are taken greedily in precedence order; a candidate is kept
/// only if it does not overlap anything kept before it. Identical ranges
/// collapse to a single span. The result is ordered by start offset.
pub fn resolve_conflicts(mut candidates: Vec<EntitySpan>) -> Vec<EntitySpan> {
    candidates.retain(|span| !span.is_empty());
    candidates.sort_by(precedence);

    // Disjoint and sorted by start, so only the neighbours of the insertion
    // point can overlap a candidate
    let mut kept: Vec<EntitySpan> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let pos = kept.partition_point(|span| span.start < candidate.start);
        let before = pos.checked_sub(1).map(|i| &kept[i]);
        let after = kept.get(pos);
        if before
            .into_iter()
            .chain(after)
            .all(|span| !span.overlaps(&candidate))
        {
            kept.insert(pos, candidate);
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityType;

    fn span(entity_type: EntityType, start: usize, end: usize, score: f64) -> EntitySpan {
        EntitySpan::new(entity_type, start, end, score)
    }

    fn ranges(spans: &[EntitySpan]) -> Vec<(EntityType, usize, usize)> {
        spans.iter().map(|s| (s.entity_type, s.start, s.end)).collect()
    }

    #[test]
    fn test_higher_score_wins_same_range() {
        let resolved = resolve_conflicts(vec![
            span(EntityType::PhoneNumber, 0, 10, 0.6),
            span(EntityType::NationalId, 0, 10, 0.9),
        ]);
        assert_eq!(ranges(&resolved), vec![(EntityType::NationalId, 0, 10)]);
    }

    #[test]
    fn test_higher_score_wins_over_longer_span() {
        let resolved = resolve_conflicts(vec![
            span(EntityType::Location, 8, 12, 0.80),
            span(EntityType::Person, 8, 16, 0.95),
        ]);
        assert_eq!(ranges(&resolved), vec![(EntityType::Person, 8, 16)]);

        let resolved = resolve_conflicts(vec![
            span(EntityType::Location, 8, 12, 0.95),
            span(EntityType::Person, 8, 16, 0.80),
        ]);
        assert_eq!(ranges(&resolved), vec![(EntityType::Location, 8, 12)]);
    }

    #[test]
    fn test_equal_scores_prefer_longer_then_earlier() {
        let resolved = resolve_conflicts(vec![
            span(EntityType::DateTime, 5, 9, 0.6),
            span(EntityType::PhoneNumber, 3, 12, 0.6),
        ]);
        assert_eq!(ranges(&resolved), vec![(EntityType::PhoneNumber, 3, 12)]);

        let resolved = resolve_conflicts(vec![
            span(EntityType::DateTime, 4, 8, 0.6),
            span(EntityType::DateTime, 2, 6, 0.6),
        ]);
        assert_eq!(ranges(&resolved), vec![(EntityType::DateTime, 2, 6)]);
    }

    #[test]
    fn test_identical_spans_collapse() {
        let resolved = resolve_conflicts(vec![
            span(EntityType::Person, 0, 4, 0.85).with_recognizer("b"),
            span(EntityType::Person, 0, 4, 0.85).with_recognizer("a"),
        ]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].recognizer, "a");
    }

    #[test]
    fn test_chain_keeps_non_adjacent_winners() {
        // B overlaps both A and C; A and C do not touch each other
        let resolved = resolve_conflicts(vec![
            span(EntityType::Location, 0, 5, 0.9),
            span(EntityType::Person, 3, 9, 0.7),
            span(EntityType::DateTime, 7, 12, 0.8),
        ]);
        assert_eq!(
            ranges(&resolved),
            vec![(EntityType::Location, 0, 5), (EntityType::DateTime, 7, 12)]
        );
    }

    #[test]
    fn test_adjacent_spans_both_survive_sorted() {
        let resolved = resolve_conflicts(vec![
            span(EntityType::EmailAddress, 10, 20, 0.5),
            span(EntityType::Person, 0, 10, 0.9),
        ]);
        assert_eq!(
            ranges(&resolved),
            vec![(EntityType::Person, 0, 10), (EntityType::EmailAddress, 10, 20)]
        );
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let a = span(EntityType::Person, 0, 6, 0.7);
        let b = span(EntityType::Location, 0, 6, 0.7);
        let forward = resolve_conflicts(vec![a.clone(), b.clone()]);
        let backward = resolve_conflicts(vec![b, a]);
        assert_eq!(ranges(&forward), ranges(&backward));
        assert_eq!(forward[0].entity_type, EntityType::Person);
    }

    #[test]
    fn test_large_overlapping_input() {
        // Every window of width 3 overlaps its neighbours; later windows score higher
        let candidates: Vec<EntitySpan> = (0..5_000)
            .map(|i| span(EntityType::NationalId, i, i + 3, i as f64 / 5_000.0))
            .collect();

        let resolved = resolve_conflicts(candidates);

        assert_eq!(resolved.first().map(|s| s.start), Some(1));
        assert_eq!(resolved.last().map(|s| s.start), Some(4_999));
        assert_eq!(resolved.len(), 1_667);
        for pair in resolved.windows(2) {
            assert_eq!(pair[1].start, pair[0].end);
        }
    }
}
