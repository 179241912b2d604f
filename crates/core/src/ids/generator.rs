use std::fmt;

use aes::{
    Aes128, Block,
    cipher::{BlockEncrypt, KeyInit},
};
use parking_lot::Mutex;

use crate::{
    error::{Result, TraceError},
    ids::Id,
};

const BLOCK_SIZE: usize = 16;
const KEY_SIZE: usize = 16;
const ID_SIZE: usize = BLOCK_SIZE / 2;

/// Thread-safe source of unique, unpredictable [`Id`]s.
///
/// IDs are cut in 64-bit halves from an AES-128-CTR keystream. The key and the
/// initial counter are drawn from the OS entropy source once, at construction.
/// Each lock acquisition performs at most one block encryption, which is
/// amortized over two IDs.
pub struct IdGenerator {
    cipher: Aes128,
    keystream: Mutex<Keystream>,
}

struct Keystream {
    counter: u128,
    block: [u8; BLOCK_SIZE],
    offset: usize,
}

impl IdGenerator {
    /// Seeds a generator from the OS entropy source.
    ///
    /// Fails with [`TraceError::EntropyUnavailable`] or
    /// [`TraceError::CipherInit`]; either one means the process has no
    /// trustworthy generator and should not start serving.
    pub fn new() -> Result<Self> {
        let mut seed = [0u8; KEY_SIZE + BLOCK_SIZE];
        getrandom::fill(&mut seed).map_err(|e| TraceError::EntropyUnavailable {
            reason: e.to_string(),
        })?;

        let (key, counter) = seed.split_at(KEY_SIZE);
        let generator = Self::from_parts(key, counter)?;
        tracing::debug!("id generator seeded from OS entropy");
        Ok(generator)
    }

    /// Builds a generator from an explicit key and initial counter block.
    pub fn from_parts(key: &[u8], counter: &[u8]) -> Result<Self> {
        let cipher = Aes128::new_from_slice(key).map_err(|_| TraceError::CipherInit)?;
        let counter: [u8; BLOCK_SIZE] = counter.try_into().map_err(|_| TraceError::CipherInit)?;

        Ok(Self {
            cipher,
            keystream: Mutex::new(Keystream {
                counter: u128::from_be_bytes(counter),
                block: [0; BLOCK_SIZE],
                offset: BLOCK_SIZE,
            }),
        })
    }

    /// Returns an ID never returned before by this generator.
    ///
    /// Zero is reserved for "no parent" and is never handed out.
    pub fn next_id(&self) -> Id {
        loop {
            let raw = self.next_raw();
            if raw != 0 {
                return Id::new(raw);
            }
        }
    }

    fn next_raw(&self) -> u64 {
        let mut ks = self.keystream.lock();
        if ks.offset == BLOCK_SIZE {
            let mut block = Block::clone_from_slice(&ks.counter.to_be_bytes());
            self.cipher.encrypt_block(&mut block);
            ks.block.copy_from_slice(&block);
            ks.counter = ks.counter.wrapping_add(1);
            ks.offset = 0;
        }

        let start = ks.offset;
        let mut half = [0u8; ID_SIZE];
        half.copy_from_slice(&ks.block[start..start + ID_SIZE]);
        ks.offset += ID_SIZE;

        u64::from_le_bytes(half)
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator").finish_non_exhaustive()
    }
}
