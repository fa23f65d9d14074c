//! Frame-to-frame face association
//!
//! Each detected face needs a stable identity so its temporal closure state
//! does not interfere with other subjects in the frame. Nearest-centroid
//! matching is enough for a fixed cabin camera; tracks expire after a
//! configurable number of frames without a matching detection.

use crate::config::DetectionConfig;
use tracing::debug;

/// Stable identifier for one tracked face
pub type TrackId = u64;

#[derive(Debug, Clone)]
struct Track {
    id: TrackId,
    centroid: (f64, f64),
    missed_frames: u32,
}

/// Result of one association pass
#[derive(Debug, Clone)]
pub struct Assignment {
    /// Track id per input detection, in input order
    pub ids: Vec<TrackId>,
    /// Tracks that expired during this pass
    pub retired: Vec<TrackId>,
}

/// Nearest-centroid face tracker
#[derive(Debug, Default)]
pub struct FaceTracker {
    tracks: Vec<Track>,
    next_id: TrackId,
}

impl FaceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate this frame's detection centroids with existing tracks.
    ///
    /// Greedy nearest-match within `max_match_distance`; unmatched
    /// detections start fresh tracks, unmatched tracks age and expire after
    /// `track_expiry_frames` misses.
    pub fn assign(&mut self, centroids: &[(f64, f64)], config: &DetectionConfig) -> Assignment {
        let mut matched = vec![false; self.tracks.len()];
        let mut ids = Vec::with_capacity(centroids.len());

        for &centroid in centroids {
            let nearest = self
                .tracks
                .iter()
                .enumerate()
                .filter(|(i, _)| !matched[*i])
                .map(|(i, track)| (i, centroid_distance(track.centroid, centroid)))
                .filter(|(_, dist)| *dist <= config.max_match_distance)
                .min_by(|a, b| a.1.total_cmp(&b.1));

            match nearest {
                Some((index, _)) => {
                    matched[index] = true;
                    self.tracks[index].centroid = centroid;
                    self.tracks[index].missed_frames = 0;
                    ids.push(self.tracks[index].id);
                }
                None => {
                    let id = self.next_id;
                    self.next_id += 1;
                    debug!(track = id, "new face track");
                    self.tracks.push(Track {
                        id,
                        centroid,
                        missed_frames: 0,
                    });
                    matched.push(true);
                    ids.push(id);
                }
            }
        }

        let mut retired = Vec::new();
        self.tracks.retain_mut(|track| {
            if track.missed_frames == 0 && ids.contains(&track.id) {
                return true;
            }
            track.missed_frames += 1;
            if track.missed_frames > config.track_expiry_frames {
                debug!(track = track.id, "face track expired");
                retired.push(track.id);
                false
            } else {
                true
            }
        });

        Assignment { ids, retired }
    }

    /// Number of live tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

fn centroid_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DetectionConfig {
        DetectionConfig {
            max_match_distance: 50.0,
            track_expiry_frames: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_stable_id_across_small_motion() {
        let config = config();
        let mut tracker = FaceTracker::new();

        let first = tracker.assign(&[(100.0, 100.0)], &config);
        let second = tracker.assign(&[(110.0, 95.0)], &config);
        assert_eq!(first.ids, second.ids);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_two_faces_keep_distinct_ids() {
        let config = config();
        let mut tracker = FaceTracker::new();

        let first = tracker.assign(&[(100.0, 100.0), (400.0, 100.0)], &config);
        assert_ne!(first.ids[0], first.ids[1]);

        // Both move a little; order of detections flips
        let second = tracker.assign(&[(395.0, 105.0), (105.0, 102.0)], &config);
        assert_eq!(second.ids[0], first.ids[1]);
        assert_eq!(second.ids[1], first.ids[0]);
    }

    #[test]
    fn test_distant_detection_starts_new_track() {
        let config = config();
        let mut tracker = FaceTracker::new();

        let first = tracker.assign(&[(100.0, 100.0)], &config);
        let second = tracker.assign(&[(300.0, 300.0)], &config);
        assert_ne!(first.ids[0], second.ids[0]);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_track_expires_after_misses() {
        let config = config();
        let mut tracker = FaceTracker::new();

        let first = tracker.assign(&[(100.0, 100.0)], &config);
        let id = first.ids[0];

        assert!(tracker.assign(&[], &config).retired.is_empty());
        assert!(tracker.assign(&[], &config).retired.is_empty());
        let third = tracker.assign(&[], &config);
        assert_eq!(third.retired, vec![id]);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_reappearing_face_within_expiry_keeps_id() {
        let config = config();
        let mut tracker = FaceTracker::new();

        let first = tracker.assign(&[(100.0, 100.0)], &config);
        tracker.assign(&[], &config);
        let back = tracker.assign(&[(104.0, 99.0)], &config);
        assert_eq!(back.ids, first.ids);
    }
}
