use anyhow::{Result, bail, ensure};
use block_padding::array::Array;
use block_padding::array::typenum::U16;
use block_padding::{PaddedData, Padding, Pkcs7};

use crate::config::BLOCK_SIZE;

/// PKCS#7 padding over the AES block.
///
/// Works on the tail of a stream only: the encrypting side hands over the
/// bytes left after its last whole block, the decrypting side hands over the
/// last decrypted block.
pub struct Pkcs7Padding;

impl Pkcs7Padding {
    /// Pads a tail shorter than one block into exactly one block.
    ///
    /// An empty tail becomes a full block of padding.
    pub fn pad_tail(tail: &[u8]) -> Result<[u8; BLOCK_SIZE]> {
        ensure!(tail.len() < BLOCK_SIZE, "tail must be shorter than one block, got {} bytes", tail.len());

        match Pkcs7::pad_detached::<U16>(tail) {
            PaddedData::Pad { blocks, tail_block } if blocks.is_empty() => {
                let mut out = [0u8; BLOCK_SIZE];
                out.copy_from_slice(tail_block.as_slice());
                Ok(out)
            }
            PaddedData::Pad { .. } | PaddedData::NoPad { .. } => bail!("unexpected padded length"),
            PaddedData::Error => bail!("padding error"),
        }
    }

    /// Strips padding from the final block, returning the payload bytes it held.
    pub fn unpad_block(block: &[u8; BLOCK_SIZE]) -> Result<Vec<u8>> {
        let mut arr: Array<u8, U16> = Array::default();
        arr.copy_from_slice(block);
        Ok(Pkcs7::unpad_blocks::<U16>(&[arr])?.to_vec())
    }
}
