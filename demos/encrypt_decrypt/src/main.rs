//! Example program demonstrating `ece`.

use ece::{decrypt, encrypt, Params, Variant};

fn main() {
    let params = Params::new(Variant::Aes128Gcm)
        .with_key(vec![0xAAu8; 16])
        .with_keyid("a1");

    let pt = b"this data needs to be encrypted";
    let ct = encrypt(pt, &params).unwrap();
    println!("'{}' => {}", String::from_utf8_lossy(pt), hex::encode(&ct));

    let pt2 = decrypt(&ct, &params).unwrap();
    assert_eq!(&pt[..], pt2.as_slice());
}
