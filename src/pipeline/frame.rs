use crate::error::{Result, StegError};

/// Length prefix size in bits (u32, big-endian)
pub const LENGTH_PREFIX_BITS: usize = 32;

/// An ordered sequence of single bits
/// Framed layout: [32 bits: big-endian byte length][length*8 bits, MSB first per byte]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitSequence {
    bits: Vec<bool>,
}

impl BitSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Append the lowest `count` bits of `value`, most significant first
    pub fn push_bits(&mut self, value: u32, count: usize) {
        for shift in (0..count).rev() {
            self.bits.push((value >> shift) & 1 == 1);
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }
}

impl From<Vec<bool>> for BitSequence {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

/// Number of bits a framed message of `len` bytes occupies
pub fn framed_len(len: usize) -> u64 {
    LENGTH_PREFIX_BITS as u64 + len as u64 * 8
}

/// Frame message bytes into a length-prefixed bit sequence
pub fn frame(message: &[u8]) -> Result<BitSequence> {
    let len = u32::try_from(message.len())
        .map_err(|_| StegError::InvalidLength(message.len() as u64))?;

    let mut bits = BitSequence::with_capacity(framed_len(message.len()) as usize);
    bits.push_bits(len, LENGTH_PREFIX_BITS);
    for &byte in message {
        bits.push_bits(u32::from(byte), 8);
    }
    Ok(bits)
}

/// Decode the 32-bit big-endian length prefix from the first bits
pub fn read_length_prefix<I>(bits: I) -> Option<u32>
where
    I: IntoIterator<Item = bool>,
{
    let mut value = 0u32;
    let mut taken = 0;
    for bit in bits.into_iter().take(LENGTH_PREFIX_BITS) {
        value = (value << 1) | u32::from(bit);
        taken += 1;
    }
    (taken == LENGTH_PREFIX_BITS).then_some(value)
}

/// Pack bits into bytes, most significant bit first
/// Trailing bits that do not fill a byte are dropped
pub fn pack_bytes<I>(bits: I) -> Vec<u8>
where
    I: IntoIterator<Item = bool>,
{
    let mut bytes = Vec::new();
    let mut current = 0u8;
    let mut collected = 0;
    for bit in bits {
        current = (current << 1) | u8::from(bit);
        collected += 1;
        if collected == 8 {
            bytes.push(current);
            current = 0;
            collected = 0;
        }
    }
    bytes
}

/// Recover message bytes from a framed bit sequence
/// Bits beyond the declared length are ignored
pub fn unframe(bits: &BitSequence) -> Result<Vec<u8>> {
    let len = read_length_prefix(bits.iter()).ok_or(StegError::InsufficientCapacity {
        required: LENGTH_PREFIX_BITS as u64,
        available: bits.len() as u64,
    })?;
    if len == 0 {
        return Err(StegError::InvalidLength(0));
    }

    let required = framed_len(len as usize);
    if (bits.len() as u64) < required {
        return Err(StegError::InsufficientCapacity {
            required,
            available: bits.len() as u64,
        });
    }

    let body = bits.iter().skip(LENGTH_PREFIX_BITS).take(len as usize * 8);
    Ok(pack_bytes(body))
}
