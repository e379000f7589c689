//! The chart JSON document model.
//!
//! Field names follow the wire format (`isEnd`, `toTrack`, `time_dur`,
//! single-note `note` arrays) so the serde model round-trips the client's
//! JSON without translation tables.

use serde::{Deserialize, Serialize};

/// Signature constant carried by every chart document.
pub const SIGNATURE: &str = "BNDQ";

/// Track numbering base offset; track ids 0–2 are reserved by the client.
pub const TRACK_START: i32 = 3;

/// Default tempo for newly created charts, in beats per minute.
pub const DEFAULT_TEMPO: f64 = 100.0;

/// One chart: metadata plus per-track ordered note lists.
///
/// `duration` counts ticks, `durationtime` milliseconds
/// (`1 tick = 60000ms / tempo / 48`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDocument {
    pub signature: String,
    /// Wire protocol version, semver-like (e.g. `1.3.0`).
    pub version: String,
    /// Song BPM.
    pub tempo: f64,
    /// Song duration in ticks.
    pub duration: i64,
    /// Song duration in milliseconds.
    pub durationtime: i64,
    pub tracks: Vec<Track>,
}

impl ChartDocument {
    /// New empty document with one empty track per key, numbered
    /// contiguously from [`TRACK_START`].
    pub fn empty(key_count: u32) -> Self {
        let tracks = (0..key_count as i32)
            .map(|i| Track {
                track: TRACK_START + i,
                note: Vec::new(),
            })
            .collect();
        Self {
            signature: SIGNATURE.to_string(),
            version: String::new(),
            tempo: DEFAULT_TEMPO,
            duration: 0,
            durationtime: 0,
            tracks,
        }
    }

    /// Number of playable tracks.
    pub fn key_count(&self) -> usize {
        self.tracks.len()
    }
}

/// One playable track. Notes are not guaranteed sorted on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track id, starting at [`TRACK_START`].
    pub track: i32,
    /// Notes on this track, wire name `note`.
    pub note: Vec<Note>,
}

/// One atomic note event, exactly as persisted.
///
/// `attr` and `isEnd` jointly encode the note's role in a gesture:
///
/// | Role | Fields |
/// |------|--------|
/// | tap | `toTrack == 0` |
/// | chain start | `isEnd == 0 && attr == 3` |
/// | chain process | `isEnd == 0 && attr == 4` |
/// | chain end | `isEnd == 1 && attr == 4` |
/// | single hold/slide | `isEnd == 1 && attr == 3` |
///
/// `dur > 0` marks a hold; `dur == 0` with a nonzero `toTrack` marks a
/// slide. Resolution state lives in [`ActionIndex`], never on the note.
///
/// [`ActionIndex`]: crate::chart::ActionIndex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Index in the global time-sorted flattening; recomputed on output.
    pub idx: i64,
    /// Hit time in ticks.
    pub tick: i64,
    /// Always 0.
    pub key: i64,
    /// Hold duration in ticks; 0 for taps and slides.
    pub dur: i64,
    /// 1 when this note ends a continuous action.
    #[serde(rename = "isEnd")]
    pub is_end: u8,
    /// Target track for holds (own track) and slides (destination track);
    /// 0 for taps.
    #[serde(rename = "toTrack")]
    pub to_track: i32,
    /// Always 0.
    pub volume: i64,
    /// Always 0.
    pub pan: i64,
    /// 0 = tap, 3 = chain start, 4 = chain process/end.
    pub attr: u8,
    /// Hit time in milliseconds.
    pub time: i64,
    /// Hold duration in ms, or the signed track offset for slides.
    pub time_dur: i64,
}

impl Note {
    /// Single tap.
    pub fn is_tap(&self) -> bool {
        self.to_track == 0
    }

    /// Hold, standalone or inside a chain.
    pub fn is_hold(&self) -> bool {
        self.dur > 0
    }

    /// Slide, standalone or inside a chain.
    pub fn is_slide(&self) -> bool {
        !self.is_hold() && !self.is_tap()
    }

    /// Complete on its own: a tap, or a one-note hold/slide.
    pub fn is_single_action(&self) -> bool {
        self.is_tap() || (self.is_end == 1 && self.attr == 3)
    }

    /// Opens a continuous action.
    pub fn is_chain_start(&self) -> bool {
        self.is_end == 0 && self.attr == 3
    }

    /// Interior segment of a continuous action.
    pub fn is_chain_process(&self) -> bool {
        self.is_end == 0 && self.attr == 4
    }

    /// Final segment of a continuous action.
    pub fn is_chain_end(&self) -> bool {
        self.is_end == 1 && self.attr == 4
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

    #[test]
    fn test_empty_document_tracks() {
        let doc = ChartDocument::empty(5);
        assert_eq!(doc.signature, SIGNATURE);
        assert_eq!(doc.key_count(), 5);
        let ids: Vec<i32> = doc.tracks.iter().map(|t| t.track).collect();
        assert_eq!(ids, vec![3, 4, 5, 6, 7]);
        assert!(doc.tracks.iter().all(|t| t.note.is_empty()));
    }

    #[test]
    fn test_note_roles() {
        let tap = note(0, 0, 0, 0, 0);
        assert!(tap.is_tap() && tap.is_single_action() && !tap.is_hold());

        let single_hold = note(0, 10, 1, 3, 3);
        assert!(single_hold.is_hold() && single_hold.is_single_action());

        let chain_start = note(0, 10, 0, 4, 3);
        assert!(chain_start.is_chain_start() && !chain_start.is_single_action());

        let slide = note(10, 0, 0, 5, 4);
        assert!(slide.is_slide() && slide.is_chain_process());

        let chain_end = note(15, 0, 1, 0, 4);
        assert!(chain_end.is_chain_end());
    }

    #[test]
    fn test_wire_field_names() {
        let json = r#"{"idx":0,"tick":48,"key":0,"dur":24,"isEnd":0,"toTrack":4,"volume":0,"pan":0,"attr":3,"time":250,"time_dur":125}"#;
        let n: Note = serde_json::from_str(json).unwrap();
        assert_eq!(n.is_end, 0);
        assert_eq!(n.to_track, 4);
        let back = serde_json::to_string(&n).unwrap();
        assert!(back.contains("\"isEnd\":0"));
        assert!(back.contains("\"toTrack\":4"));
        assert!(back.contains("\"time_dur\":125"));
    }

    #[test]
    fn test_document_round_trip() {
        let mut doc = ChartDocument::empty(4);
        doc.version = "1.3.0".to_string();
        doc.tracks[1].note.push(note(96, 0, 0, 0, 0));
        let json = serde_json::to_string(&doc).unwrap();
        let parsed: ChartDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
    }
}
