//! Gesture resolution.
//!
//! Charts store atomic note events per track; one performer action (a tap,
//! a hold, a multi-track slide chain) may span several notes on several
//! tracks. Resolution flattens all tracks into the canonical
//! `(tick, owner track)` order and stitches chained notes back together in
//! a single greedy forward pass.
//!
//! Malformed charts are tolerated, never rejected: a chain start that
//! appears before the previous chain reached its end is skipped and left
//! to open its own group, and a note whose tick misses the expected
//! junction is ignored.
//!
//! Resolution state lives entirely in the [`ActionIndex`] side structure,
//! keyed by position in the sorted flattening; the notes themselves stay
//! untouched.

use super::document::{ChartDocument, Note};

/// A note paired with the track it lives on.
///
/// The owner track participates in the canonical sort order and in chain
/// matching, but is not a persisted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedNote {
    /// Id of the track holding this note.
    pub owner_track: i32,
    pub note: Note,
}

/// Flatten every track into one sequence in canonical order:
/// tick ascending, then owner track ascending. The sort is stable, so
/// notes sharing both keys keep their track-local order.
pub fn flatten(doc: &ChartDocument) -> Vec<PlacedNote> {
    let mut notes: Vec<PlacedNote> = doc
        .tracks
        .iter()
        .flat_map(|track| {
            track.note.iter().map(|&note| PlacedNote {
                owner_track: track.track,
                note,
            })
        })
        .collect();
    notes.sort_by_key(|p| (p.note.tick, p.owner_track));
    notes
}

/// The derived gesture grouping for one chart.
///
/// Every note in the flattening belongs to exactly one action; single-note
/// actions are taps and unchained holds/slides.
#[derive(Debug, Clone, Default)]
pub struct ActionIndex {
    notes: Vec<PlacedNote>,
    /// Each action as ordered positions into `notes`.
    actions: Vec<Vec<usize>>,
    /// Position in `notes` → owning action id.
    action_of: Vec<usize>,
}

impl ActionIndex {
    /// Resolve a document's notes into actions.
    pub fn resolve(doc: &ChartDocument) -> Self {
        let notes = flatten(doc);
        let total = notes.len();
        let mut resolved = vec![false; total];
        let mut actions: Vec<Vec<usize>> = Vec::new();
        let mut action_of = vec![0usize; total];

        for index in 0..total {
            if resolved[index] {
                continue;
            }
            let note = notes[index].note;
            let action_id = actions.len();
            let mut group = vec![index];
            resolved[index] = true;
            action_of[index] = action_id;

            if !starts_alone(&note) {
                let mut expected_track = note.to_track;
                let mut expected_tick = note.tick + note.dur;

                for i in index + 1..total {
                    let cur = &notes[i];

                    // Past the junction point, nothing can continue the chain.
                    if cur.note.tick > expected_tick {
                        break;
                    }
                    // Already claimed by an earlier chain.
                    if resolved[i] {
                        continue;
                    }
                    // Taps and one-note holds/slides never join a chain.
                    if skipped_in_scan(&cur.note) {
                        continue;
                    }
                    // Wrong track.
                    if cur.owner_track != expected_track {
                        continue;
                    }
                    // A fresh chain start before this chain ended: malformed
                    // chart, leave it to open its own group.
                    if cur.note.is_chain_start() {
                        continue;
                    }
                    // Right track, wrong junction tick.
                    if cur.note.tick != expected_tick {
                        continue;
                    }

                    resolved[i] = true;
                    group.push(i);
                    action_of[i] = action_id;
                    expected_track = cur.note.to_track;
                    expected_tick = cur.note.tick + cur.note.dur;
                }
            }

            actions.push(group);
        }

        Self {
            notes,
            actions,
            action_of,
        }
    }

    /// The canonical flattening the positions index into.
    pub fn flat_notes(&self) -> &[PlacedNote] {
        &self.notes
    }

    /// Number of resolved actions.
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Ordered flat positions of one action.
    pub fn action(&self, id: usize) -> &[usize] {
        &self.actions[id]
    }

    /// All actions, in discovery order.
    pub fn actions(&self) -> &[Vec<usize>] {
        &self.actions
    }

    /// Id of the action owning the note at a flat position.
    pub fn action_of(&self, position: usize) -> usize {
        self.action_of[position]
    }

    /// The notes of one action, in chain order.
    pub fn action_notes(&self, id: usize) -> impl Iterator<Item = &PlacedNote> {
        self.actions[id].iter().map(|&p| &self.notes[p])
    }
}

/// A note whose group is complete the moment it starts one: a tap, or a
/// hold/slide that never chains (`isEnd == 1 && attr == 3`).
fn starts_alone(note: &Note) -> bool {
    (note.is_tap() && note.attr != 4) || (note.is_end == 1 && note.attr == 3)
}

/// Scan skip rule: taps and one-note actions cannot continue a chain.
/// Chain segments (`attr == 4`) are always candidates, even a chain end
/// whose `toTrack` is 0.
fn skipped_in_scan(note: &Note) -> bool {
    note.attr != 4 && (note.is_tap() || note.is_end == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::document::Track;

    fn note(tick: i64, dur: i64, is_end: u8, to_track: i32, attr: u8) -> Note {
        Note {
            idx: 0,
            tick,
            key: 0,
            dur,
            is_end,
            to_track,
            volume: 0,
            pan: 0,
            attr,
            time: 0,
            time_dur: 0,
        }
    }

    fn doc_with(notes_by_track: Vec<(i32, Vec<Note>)>) -> ChartDocument {
        let mut doc = ChartDocument::empty(0);
        doc.tracks = notes_by_track
            .into_iter()
            .map(|(track, note)| Track { track, note })
            .collect();
        doc
    }

    #[test]
    fn test_flatten_orders_by_tick_then_track() {
        let doc = doc_with(vec![
            (4, vec![note(10, 0, 0, 0, 0), note(0, 0, 0, 0, 0)]),
            (3, vec![note(10, 0, 0, 0, 0)]),
        ]);
        let flat = flatten(&doc);
        let order: Vec<(i64, i32)> = flat.iter().map(|p| (p.note.tick, p.owner_track)).collect();
        assert_eq!(order, vec![(0, 4), (10, 3), (10, 4)]);
    }

    #[test]
    fn test_tap_is_singleton_group() {
        let doc = doc_with(vec![(3, vec![note(0, 0, 0, 0, 0), note(48, 0, 0, 0, 0)])]);
        let index = ActionIndex::resolve(&doc);
        assert_eq!(index.action_count(), 2);
        assert!(index.actions().iter().all(|g| g.len() == 1));
    }

    #[test]
    fn test_slide_chain_resolves_in_order() {
        // The three-note chain across tracks 4 → 5 → 6.
        let doc = doc_with(vec![
            (4, vec![note(0, 10, 0, 5, 3)]),
            (5, vec![note(10, 5, 0, 6, 4)]),
            (6, vec![note(15, 0, 1, 0, 4)]),
        ]);
        let index = ActionIndex::resolve(&doc);
        assert_eq!(index.action_count(), 1);
        let chain: Vec<(i64, i32)> = index
            .action_notes(0)
            .map(|p| (p.note.tick, p.owner_track))
            .collect();
        assert_eq!(chain, vec![(0, 4), (10, 5), (15, 6)]);
    }

    #[test]
    fn test_single_hold_is_singleton() {
        let doc = doc_with(vec![(3, vec![note(0, 24, 1, 3, 3)])]);
        let index = ActionIndex::resolve(&doc);
        assert_eq!(index.action_count(), 1);
        assert_eq!(index.action(0).len(), 1);
    }

    #[test]
    fn test_malformed_chain_start_is_skipped() {
        // A fresh chain start sits on the expected track before the
        // junction tick. It must not merge into the running chain; it
        // opens its own group instead.
        let doc = doc_with(vec![
            (4, vec![note(0, 10, 0, 5, 3)]),
            (
                5,
                vec![note(5, 20, 0, 6, 3), note(10, 0, 1, 0, 4)],
            ),
        ]);
        let index = ActionIndex::resolve(&doc);
        assert_eq!(index.action_count(), 2);

        let first: Vec<i64> = index.action_notes(0).map(|p| p.note.tick).collect();
        assert_eq!(first, vec![0, 10]);

        let second: Vec<i64> = index.action_notes(1).map(|p| p.note.tick).collect();
        assert_eq!(second, vec![5]);
    }

    #[test]
    fn test_tick_mismatch_ends_scan() {
        // The only candidate arrives after the junction tick: the chain
        // stays open-ended and the candidate starts its own group.
        let doc = doc_with(vec![
            (4, vec![note(0, 10, 0, 5, 3)]),
            (5, vec![note(12, 0, 1, 0, 4)]),
        ]);
        let index = ActionIndex::resolve(&doc);
        assert_eq!(index.action_count(), 2);
    }

    #[test]
    fn test_every_note_in_exactly_one_group() {
        let doc = doc_with(vec![
            (3, vec![note(0, 0, 0, 0, 0), note(48, 24, 1, 3, 3)]),
            (4, vec![note(0, 10, 0, 5, 3), note(96, 0, 0, 0, 0)]),
            (5, vec![note(10, 0, 1, 0, 4)]),
        ]);
        let index = ActionIndex::resolve(&doc);
        let mut seen = vec![0usize; index.flat_notes().len()];
        for group in index.actions() {
            for &p in group {
                seen[p] += 1;
            }
        }
        assert!(seen.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let doc = doc_with(vec![
            (4, vec![note(0, 10, 0, 5, 3)]),
            (5, vec![note(10, 5, 0, 6, 4)]),
            (6, vec![note(15, 0, 1, 0, 4)]),
        ]);
        let a = ActionIndex::resolve(&doc);
        let b = ActionIndex::resolve(&doc);
        assert_eq!(a.actions(), b.actions());
    }
}
