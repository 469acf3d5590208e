use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{BOARD_WIDTH, Origin, Piece, PieceKind, Placement};

/// How the spawner picks the next kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Randomizer {
    /// Independent uniform draws over the 7 kinds. Repeats are possible.
    #[default]
    Uniform,
    /// Shuffled bags of all 7 kinds: each kind appears once per 7 draws.
    SevenBag,
}

/// Produces pieces and keeps the one-piece lookahead flowing.
///
/// The caller owns the queued kind (the "next piece"); [`spawn`](Self::spawn)
/// turns it into a placement at the top-center of the board and draws a fresh
/// kind to replace it. Whether the placement is legal is for the caller to decide.
///
/// # Example
///
/// ```
/// use tetron_engine::{PieceKind, PieceSpawner, Origin};
///
/// let mut spawner = PieceSpawner::new();
/// let (placement, _next) = spawner.spawn(PieceKind::I);
/// assert_eq!(placement.kind(), PieceKind::I);
/// assert_eq!(placement.origin(), Origin::new(3, 0));
/// ```
#[derive(Debug, Clone)]
pub struct PieceSpawner {
    rng: Pcg32,
    randomizer: Randomizer,
    bag: Vec<PieceKind>,
}

impl Default for PieceSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceSpawner {
    /// Creates a uniform spawner seeded from the thread-local RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(PieceSeed::random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            randomizer: Randomizer::default(),
            bag: Vec::with_capacity(PieceKind::LEN),
        }
    }

    /// Switches the randomizer used for subsequent draws.
    #[must_use]
    pub fn randomizer(self, randomizer: Randomizer) -> Self {
        Self {
            randomizer,
            bag: Vec::with_capacity(PieceKind::LEN),
            ..self
        }
    }

    #[must_use]
    pub fn current_randomizer(&self) -> Randomizer {
        self.randomizer
    }

    /// Draws one kind.
    ///
    /// # Panics
    ///
    /// Panics if the bag is empty after refilling (should never happen).
    pub fn draw(&mut self) -> PieceKind {
        match self.randomizer {
            Randomizer::Uniform => self.rng.random(),
            Randomizer::SevenBag => {
                if self.bag.is_empty() {
                    self.bag.extend(PieceKind::ALL);
                    self.bag.shuffle(&mut self.rng);
                }
                self.bag.pop().expect("piece bag should never be empty")
            }
        }
    }

    /// Turns the queued kind into a spawn placement and draws its replacement.
    ///
    /// Returns `(placement, new_queued_kind)`.
    pub fn spawn(&mut self, queued: PieceKind) -> (Placement, PieceKind) {
        let piece = Piece::new(queued);
        let placement = Placement::new(piece, spawn_origin(&piece));
        let next = self.draw();
        log::trace!("spawned {} with {} queued", queued.as_char(), next.as_char());
        (placement, next)
    }
}

/// Top-center origin for a freshly spawned piece:
/// `x = (BOARD_WIDTH - width) / 2`, `y = 0`.
#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn spawn_origin(piece: &Piece) -> Origin {
    let width = piece.shape().width();
    Origin::new(((BOARD_WIDTH - width) / 2) as i32, 0)
}

/// Seed for deterministic piece generation.
///
/// A 128-bit value that initializes the spawner's RNG. Identical seeds yield
/// identical piece sequences, which makes games reproducible for debugging and
/// testing. Serialized and parsed as 32 hexadecimal digits.
///
/// # Example
///
/// ```
/// use tetron_engine::{PieceSeed, PieceSpawner};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let mut a = PieceSpawner::with_seed(seed);
/// let mut b = PieceSpawner::with_seed(seed);
/// assert_eq!(a.draw(), b.draw());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Draws a seed from the thread-local RNG.
    #[must_use]
    pub fn random() -> Self {
        rand::rng().random()
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed {input:?}: expected 32 hexadecimal digits")]
pub struct ParseSeedError {
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const SEED: PieceSeed = PieceSeed([
        0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
        0x88,
    ]);

    #[test]
    fn test_spawn_origin_is_top_center() {
        let origin = |kind| spawn_origin(&Piece::new(kind));
        assert_eq!(origin(PieceKind::I), Origin::new(3, 0));
        assert_eq!(origin(PieceKind::O), Origin::new(4, 0));
        assert_eq!(origin(PieceKind::T), Origin::new(3, 0));
        assert_eq!(origin(PieceKind::S), Origin::new(3, 0));
    }

    #[test]
    fn test_spawn_returns_queued_kind() {
        let mut spawner = PieceSpawner::with_seed(SEED);
        for kind in PieceKind::ALL {
            let (placement, _) = spawner.spawn(kind);
            assert_eq!(placement.kind(), kind);
            assert_eq!(placement.shape(), &kind.base_shape());
        }
    }

    #[test]
    fn test_deterministic_piece_generation() {
        let mut a = PieceSpawner::with_seed(SEED);
        let mut b = PieceSpawner::with_seed(SEED);
        for _ in 0..50 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_uniform_draws_cover_all_kinds() {
        let mut spawner = PieceSpawner::with_seed(SEED);
        let mut counts = HashMap::new();
        for _ in 0..7000 {
            *counts.entry(spawner.draw()).or_insert(0_usize) += 1;
        }
        assert_eq!(counts.len(), PieceKind::LEN);
        for (kind, count) in counts {
            assert!((700..1300).contains(&count), "{kind:?} drawn {count} times");
        }
    }

    #[test]
    fn test_seven_bag_yields_each_kind_once_per_bag() {
        let mut spawner = PieceSpawner::with_seed(SEED).randomizer(Randomizer::SevenBag);
        for _ in 0..5 {
            let mut bag: Vec<_> = (0..PieceKind::LEN).map(|_| spawner.draw()).collect();
            bag.sort_by_key(|kind| *kind as u8);
            assert_eq!(bag, PieceKind::ALL);
        }
    }

    #[test]
    fn test_seed_format_is_32_char_hex_string() {
        let json = serde_json::to_string(&SEED).unwrap();
        assert_eq!(json, "\"123456789abcdef01122334455667788\"");
        let restored: PieceSeed = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, SEED);
    }

    #[test]
    fn test_seed_parse_accepts_uppercase() {
        let seed: PieceSeed = "123456789ABCDEF01122334455667788".parse().unwrap();
        assert_eq!(seed, SEED);
    }

    #[test]
    fn test_seed_parse_errors() {
        assert!("".parse::<PieceSeed>().is_err());
        assert!("1234".parse::<PieceSeed>().is_err());
        assert!("123456789abcdef01122334455667788aa".parse::<PieceSeed>().is_err());
        assert!("g23456789abcdef01122334455667788".parse::<PieceSeed>().is_err());
        assert!("+23456789abcdef01122334455667788".parse::<PieceSeed>().is_err());
    }

    #[test]
    fn test_serialized_seed_preserves_piece_generation() {
        let original: PieceSeed = rand::rng().random();
        let json = serde_json::to_string(&original).unwrap();
        let restored: PieceSeed = serde_json::from_str(&json).unwrap();

        let mut a = PieceSpawner::with_seed(original);
        let mut b = PieceSpawner::with_seed(restored);
        for _ in 0..20 {
            assert_eq!(a.draw(), b.draw());
        }
    }
}
