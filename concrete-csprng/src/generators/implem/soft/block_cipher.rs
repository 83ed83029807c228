use crate::generators::aes_ctr::{
    AesBlockCipher, AesKey, AES_CALLS_PER_BATCH, BYTES_PER_AES_CALL, BYTES_PER_BATCH,
};
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes128, Block};

#[derive(Clone)]
pub struct SoftwareBlockCipher {
    aes: Aes128,
}

impl AesBlockCipher for SoftwareBlockCipher {
    fn new(key: AesKey) -> SoftwareBlockCipher {
        let key = GenericArray::from(key.0.to_le_bytes());
        SoftwareBlockCipher {
            aes: Aes128::new(&key),
        }
    }

    fn generate_batch(&mut self, data: [u128; AES_CALLS_PER_BATCH]) -> [u8; BYTES_PER_BATCH] {
        let mut blocks: [Block; AES_CALLS_PER_BATCH] =
            data.map(|counter| GenericArray::from(counter.to_le_bytes()));
        self.aes.encrypt_blocks(&mut blocks);

        let mut output = [0u8; BYTES_PER_BATCH];
        for (chunk, block) in output.chunks_exact_mut(BYTES_PER_AES_CALL).zip(blocks.iter()) {
            chunk.copy_from_slice(block.as_slice());
        }
        output
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // Test vector of FIPS-197 appendix C.1
    const CIPHER_KEY: u128 = u128::from_le_bytes([
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ]);
    const PLAINTEXT: u128 = u128::from_le_bytes([
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
        0xff,
    ]);
    const CIPHERTEXT: [u8; 16] = [
        0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4, 0xc5,
        0x5a,
    ];

    #[test]
    fn test_encrypt_many_messages() {
        let mut cipher = SoftwareBlockCipher::new(AesKey(CIPHER_KEY));
        let output = cipher.generate_batch([PLAINTEXT; AES_CALLS_PER_BATCH]);
        for block in output.chunks_exact(BYTES_PER_AES_CALL) {
            assert_eq!(block, CIPHERTEXT);
        }
    }
}
