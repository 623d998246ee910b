/// FNV-1a 64-bit hasher used for frame digests and seed derivation.
#[derive(Clone, Copy, Debug)]
pub struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    /// Start from the standard offset basis.
    pub fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    /// Feed raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    /// Final hash value.
    pub fn finish(self) -> u64 {
        self.0
    }
}

/// Hash a byte slice in one call.
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_bytes(bytes);
    h.finish()
}

/// SplitMix64 generator.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    /// Seed the generator.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `[0, 1)` with 53 bits of precision.
    pub fn next_f64_01(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }
}

/// Deterministic pseudo-random number in `[0, 1)` keyed by a string seed.
///
/// Same seed, same value, on every machine and in every frame.
pub fn random(seed: &str) -> f64 {
    Rng64::new(fnv1a64(seed.as_bytes())).next_f64_01()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_matches_reference_vectors() {
        assert_eq!(fnv1a64(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a64(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn rng_is_deterministic() {
        let mut a = Rng64::new(123);
        let mut b = Rng64::new(123);
        for _ in 0..10 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn random_is_keyed_and_bounded() {
        let x = random("starX0");
        assert_eq!(x, random("starX0"));
        assert_ne!(x, random("starX1"));
        for i in 0..256 {
            let v = random(&format!("starY{i}"));
            assert!((0.0..1.0).contains(&v));
        }
    }
}
