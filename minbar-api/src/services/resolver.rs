//! Audio source resolution with multi-mirror fallback
//!
//! Builds a deterministic ordered candidate list for a (reciter, surah)
//! pair, then probes the candidates strictly in order for the first
//! reachable one. Probing is sequential with a per-attempt timeout; there
//! is no parallel racing and no retry of a failed candidate, so the worst
//! case latency is the sum of per-candidate timeouts. Resolution results
//! are not cached across calls.

use minbar_common::{ReciterId, Surah};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("Minbar/", env!("CARGO_PKG_VERSION"));

/// Primary CDN mirror; its chapter component carries a single leading zero
const PRIMARY_MIRROR: &str = "https://cdn.mp3quran.net";
/// Secondary CDN mirror
const SECONDARY_MIRROR: &str = "https://audio.qurancdn.com";
/// Archival mirror for reciters in the Alafasy alias set
const ALAFASY_ARCHIVE: &str = "https://archive.org/download/Alafasy_Mishary";
/// Generic archival fallback for all other reciters
const GENERIC_ARCHIVE: &str = "https://archive.org/download/quran-recitations";
/// Tertiary CDN mirror, last resort
const TERTIARY_MIRROR: &str = "https://mirror.quranicaudio.com";

/// Server-relative path of a locally uploaded recitation
pub fn local_upload_path(reciter: &ReciterId, surah: Surah) -> String {
    format!("/audio/uploads/surah_{}_{}.mp3", surah.padded(), reciter)
}

/// Build the ordered candidate URL list for a recitation
///
/// Pure and deterministic: the same inputs always produce the same list,
/// every input produces at least one candidate, and priority is list
/// position. The local upload always comes first; reciters outside the
/// Alafasy alias set still get the generic archival fallback rather than
/// failing.
pub fn candidate_urls(reciter: &ReciterId, surah: Surah) -> Vec<String> {
    let padded = surah.padded();

    let archive = if reciter.is_alafasy_alias() {
        format!("{}/{}.mp3", ALAFASY_ARCHIVE, padded)
    } else {
        format!("{}/{}/{}.mp3", GENERIC_ARCHIVE, reciter, padded)
    };

    vec![
        local_upload_path(reciter, surah),
        format!("{}/{}/0{}.mp3", PRIMARY_MIRROR, reciter, padded),
        format!("{}/{}/{}.mp3", SECONDARY_MIRROR, reciter, padded),
        archive,
        format!("{}/{}/{}.mp3", TERTIARY_MIRROR, reciter, padded),
    ]
}

/// A lightweight reachability check for one candidate URL
///
/// Implementations answer whether the candidate responded to a
/// metadata-only request with a successful status within the timeout.
pub trait SourceProbe {
    fn probe(&self, url: &str, timeout: Duration) -> impl Future<Output = bool> + Send;
}

/// Resolve the first reachable candidate, strictly in order
///
/// First match wins: nothing after a successful probe is contacted. A
/// failed or timed-out candidate is logged and skipped, never retried.
/// Returns `None` once every candidate has been attempted exactly once.
pub async fn resolve_reachable<P: SourceProbe>(
    probe: &P,
    candidates: &[String],
    per_attempt_timeout: Duration,
) -> Option<String> {
    for url in candidates {
        debug!(url = %url, "Probing candidate source");
        if probe.probe(url, per_attempt_timeout).await {
            debug!(url = %url, "Candidate reachable");
            return Some(url.clone());
        }
        warn!(url = %url, "Candidate unreachable, trying next");
    }
    None
}

/// Production probe: an HTTP HEAD request bounded by the attempt timeout
pub struct HeadProbe {
    client: reqwest::Client,
}

impl HeadProbe {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }
}

impl SourceProbe for HeadProbe {
    async fn probe(&self, url: &str, timeout: Duration) -> bool {
        match self.client.head(url).timeout(timeout).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(url = %url, error = %e, "Probe request failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reciter(slug: &str) -> ReciterId {
        ReciterId::new(slug).unwrap()
    }

    fn surah(n: u16) -> Surah {
        Surah::new(n).unwrap()
    }

    #[test]
    fn test_local_upload_is_always_first() {
        let urls = candidate_urls(&reciter("afasy"), surah(7));
        assert_eq!(urls[0], "/audio/uploads/surah_007_afasy.mp3");
    }

    #[test]
    fn test_candidate_count_is_fixed() {
        assert_eq!(candidate_urls(&reciter("afasy"), surah(1)).len(), 5);
        assert_eq!(candidate_urls(&reciter("sudais"), surah(114)).len(), 5);
    }

    #[test]
    fn test_chapter_component_is_three_digits() {
        for n in [1, 9, 10, 99, 100, 114] {
            let padded = surah(n).padded();
            assert_eq!(padded.len(), 3);
            for url in candidate_urls(&reciter("husary"), surah(n)) {
                assert!(url.contains(&padded), "{} should contain {}", url, padded);
            }
        }
    }

    #[test]
    fn test_primary_mirror_has_leading_zero_variant() {
        let urls = candidate_urls(&reciter("afasy"), surah(36));
        assert!(urls[1].ends_with("/afasy/0036.mp3"), "got {}", urls[1]);
    }

    #[test]
    fn test_alias_set_uses_alafasy_archive() {
        for alias in ["afasy", "mishary", "al-afasy"] {
            let urls = candidate_urls(&reciter(alias), surah(2));
            assert!(
                urls[3].starts_with(ALAFASY_ARCHIVE),
                "alias {} should use the Alafasy archive, got {}",
                alias,
                urls[3]
            );
        }
    }

    #[test]
    fn test_other_reciters_use_generic_archive() {
        let urls = candidate_urls(&reciter("sudais"), surah(2));
        assert!(urls[3].starts_with(GENERIC_ARCHIVE), "got {}", urls[3]);
        assert!(urls[3].contains("/sudais/"));
    }

    #[test]
    fn test_candidates_are_deterministic() {
        let a = candidate_urls(&reciter("husary"), surah(55));
        let b = candidate_urls(&reciter("husary"), surah(55));
        assert_eq!(a, b);
    }
}
