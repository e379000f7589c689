//! Chart loading, serialization and the gesture index.
//!
//! [`Chart`] is the one-stop surface the fetcher collaborator consumes:
//! it owns a chart's identity, its document and the resolved gesture
//! index, with no state shared across instances. Callers processing
//! several charts concurrently instantiate one `Chart` each.

pub mod document;
pub mod resolve;

pub use document::{ChartDocument, Note, Track};
pub use resolve::{ActionIndex, PlacedNote};

use crate::codec::{decrypt_chart, encrypt_chart};
use crate::error::Result;
use crate::identity::{resolve_filename, ChartFormat, ChartIdentity};

/// One loaded chart: identity, document and gesture index.
#[derive(Debug, Clone)]
pub struct Chart {
    name: String,
    difficulty: String,
    document: ChartDocument,
    actions: ActionIndex,
}

impl Chart {
    /// Load a chart from a filename/path hint and optional payload.
    ///
    /// The hint is parsed for identity only; no file is read. It decides
    /// both the cipher salt and, through its extension, how `data` is
    /// interpreted:
    ///
    /// - no data: a new empty chart with one track per key;
    /// - `.rmp`: the full decrypt pipeline, then JSON;
    /// - `.json` or anything else: parsed directly as chart JSON.
    pub fn load(path_or_name: &str, data: Option<&str>) -> Result<Self> {
        let resolved = resolve_filename(path_or_name);
        let identity = resolved.identity;

        let Some(data) = data else {
            return Ok(Self::empty(identity));
        };

        let json = match resolved.format {
            ChartFormat::Rmp => decrypt_chart(data, &identity.salt())?,
            ChartFormat::Json | ChartFormat::Unknown => data.to_string(),
        };
        let document: ChartDocument = serde_json::from_str(&json)?;
        Ok(Self::from_document(identity, document))
    }

    /// New empty chart for an identity.
    pub fn empty(identity: ChartIdentity) -> Self {
        let document = ChartDocument::empty(identity.key_count);
        Self::from_document(identity, document)
    }

    /// Wrap an already-parsed document. Resolves the gesture index
    /// immediately.
    pub fn from_document(identity: ChartIdentity, document: ChartDocument) -> Self {
        let actions = ActionIndex::resolve(&document);
        Self {
            name: identity.name,
            difficulty: identity.difficulty,
            document,
            actions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    /// Track count, taken from the document rather than the filename: a
    /// chart loaded from data trusts its own track list.
    pub fn key_count(&self) -> usize {
        self.document.key_count()
    }

    /// The chart's effective identity. Key count comes from the document,
    /// see [`key_count`](Chart::key_count).
    pub fn identity(&self) -> ChartIdentity {
        ChartIdentity::new(self.name.clone(), self.key_count() as u32, self.difficulty.clone())
    }

    /// Canonical filename stem for this chart.
    pub fn filename(&self) -> String {
        self.identity().filename()
    }

    /// Cipher salt for this chart.
    pub fn salt(&self) -> String {
        self.identity().salt()
    }

    pub fn document(&self) -> &ChartDocument {
        &self.document
    }

    /// The resolved gesture index.
    pub fn actions(&self) -> &ActionIndex {
        &self.actions
    }

    /// The canonical time-ordered flattening of all tracks.
    pub fn flattened_notes(&self) -> &[PlacedNote] {
        self.actions.flat_notes()
    }

    /// A normalized copy of the document, ready for output: every track
    /// sorted into canonical order and `idx` renumbered by position in
    /// the global flattening. Carries no resolution state; independent of
    /// the gesture grouping.
    pub fn to_map(&self) -> ChartDocument {
        let mut doc = self.document.clone();

        // Global (tick, track) order over (track slot, note slot) handles.
        let mut order: Vec<(usize, usize)> = Vec::new();
        for (t, track) in doc.tracks.iter().enumerate() {
            for n in 0..track.note.len() {
                order.push((t, n));
            }
        }
        order.sort_by_key(|&(t, n)| (doc.tracks[t].note[n].tick, doc.tracks[t].track));

        for (idx, &(t, n)) in order.iter().enumerate() {
            doc.tracks[t].note[n].idx = idx as i64;
        }

        for track in &mut doc.tracks {
            track.note.sort_by_key(|note| note.tick);
        }
        doc
    }

    /// Serialize to chart JSON (normalized, see [`to_map`](Chart::to_map)).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_map())?)
    }

    /// Serialize to the encrypted `.rmp` wire payload.
    pub fn to_raw(&self) -> Result<String> {
        encrypt_chart(&self.to_json()?, &self.salt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn sample_chart() -> Chart {
        let mut doc = ChartDocument::empty(4);
        doc.version = "1.3.0".to_string();
        doc.tempo = 120.0;
        // Out of order on purpose; to_map must canonicalize.
        doc.tracks[0].note = vec![note(48, 0, 0, 0, 0), note(0, 0, 0, 0, 0)];
        doc.tracks[1].note = vec![note(0, 10, 0, 5, 3)];
        doc.tracks[2].note = vec![note(10, 0, 1, 0, 4)];
        Chart::from_document(ChartIdentity::new("please", 4, "hd"), doc)
    }

    #[test]
    fn test_empty_chart() {
        let chart = Chart::empty(ChartIdentity::new("please", 5, "ez"));
        assert_eq!(chart.key_count(), 5);
        assert_eq!(chart.filename(), "please_5k_ez");
        assert_eq!(chart.actions().action_count(), 0);
    }

    #[test]
    fn test_load_without_data_builds_empty_chart() {
        let chart = Chart::load("please_6k_hd.rmp", None).unwrap();
        assert_eq!(chart.key_count(), 6);
        assert!(chart.flattened_notes().is_empty());
    }

    #[test]
    fn test_key_count_follows_document() {
        // A 4k filename with a 5-track document: the document wins, and
        // the salt follows it.
        let chart = Chart::from_document(
            ChartIdentity::new("please", 4, "hd"),
            ChartDocument::empty(5),
        );
        assert_eq!(chart.key_count(), 5);
        assert_eq!(chart.salt(), "RMP4TT3RNplease/please_5k_hd");
    }

    #[test]
    fn test_to_map_sorts_and_renumbers() {
        let map = sample_chart().to_map();

        // Track 3 re-sorted by tick.
        let ticks: Vec<i64> = map.tracks[0].note.iter().map(|n| n.tick).collect();
        assert_eq!(ticks, vec![0, 48]);

        // idx follows the global (tick, track) flattening:
        // (0,t3) (0,t4) (10,t5) (48,t3).
        assert_eq!(map.tracks[0].note[0].idx, 0);
        assert_eq!(map.tracks[1].note[0].idx, 1);
        assert_eq!(map.tracks[2].note[0].idx, 2);
        assert_eq!(map.tracks[0].note[1].idx, 3);
    }

    #[test]
    fn test_json_round_trip_preserves_map() {
        let chart = sample_chart();
        let json = chart.to_json().unwrap();
        let reloaded = Chart::load("please_4k_hd.json", Some(&json)).unwrap();
        assert_eq!(reloaded.to_map(), chart.to_map());
    }

    #[test]
    fn test_raw_round_trip() {
        let chart = sample_chart();
        let raw = chart.to_raw().unwrap();
        let reloaded = Chart::load("please_4k_hd.rmp", Some(&raw)).unwrap();
        assert_eq!(reloaded.to_map(), chart.to_map());
        assert_eq!(reloaded.to_json().unwrap(), chart.to_json().unwrap());
    }

    #[test]
    fn test_resolution_survives_round_trip() {
        let chart = sample_chart();
        let raw = chart.to_raw().unwrap();
        let reloaded = Chart::load("please_4k_hd.rmp", Some(&raw)).unwrap();
        assert_eq!(
            reloaded.actions().actions(),
            chart.actions().actions()
        );
    }
}
