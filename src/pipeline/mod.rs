pub mod cipher;
pub mod frame;
pub mod keywrap;
pub mod lsb;

pub use cipher::{
    decrypt_block, encrypt_block, fill_random, generate_ephemeral_key, MessageKey, BLOCK_SIZE,
    KEY_SIZE,
};
pub use frame::*;
pub use keywrap::Kek;
pub use lsb::*;
