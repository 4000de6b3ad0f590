//! Celebratory header that can be put in front of a release note.
//!
//! Selection goes through [`IndexSource`] so callers decide where the
//! randomness comes from; tests pin it with a fixed index.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub headline: &'static str,
    pub image_url: &'static str,
}

pub static BANNERS: [Banner; 2] = [
    Banner {
        headline: "Holy cow! The release is out!",
        image_url: "https://cdn.dribbble.com/users/49272/screenshots/3577612/media/1b8c974de4380c6ff55b9625179abffc.gif",
    },
    Banner {
        headline: "Release is out! We fixed a few hairy bugs.",
        image_url: "https://c.tenor.com/0ub-F8PevlwAAAAd/cow-lucioushair.gif",
    },
];

/// Source of an index in `0..len`.
pub trait IndexSource {
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform pick backed by the operating system's random source.
#[derive(Debug, Default)]
pub struct OsRandom;

impl IndexSource for OsRandom {
    fn pick(&mut self, len: usize) -> usize {
        let mut bytes = [0u8; 8];
        if let Err(e) = getrandom::fill(&mut bytes) {
            tracing::warn!(error = %e, "random source unavailable, using first banner");
            return 0;
        }
        (u64::from_le_bytes(bytes) % len as u64) as usize
    }
}

/// Always returns the same index (wrapped into range).
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedIndex(pub usize);

#[cfg(test)]
impl IndexSource for FixedIndex {
    fn pick(&mut self, _len: usize) -> usize {
        self.0
    }
}

pub fn choose_banner(source: &mut dyn IndexSource) -> &'static Banner {
    let index = source.pick(BANNERS.len()) % BANNERS.len();
    &BANNERS[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fixed_index_pins_the_banner() {
        assert_eq!(choose_banner(&mut FixedIndex(0)), &BANNERS[0]);
        assert_eq!(choose_banner(&mut FixedIndex(1)), &BANNERS[1]);
        assert_eq!(choose_banner(&mut FixedIndex(5)), &BANNERS[1]);
    }

    #[test]
    fn os_random_stays_within_candidates() {
        let mut source = OsRandom;
        for _ in 0..64 {
            let banner = choose_banner(&mut source);
            assert!(BANNERS.contains(banner));
        }
    }
}
