//! Full key-agreement + bulk-encryption walkthrough: two parties agree on a
//! shared secret over a freshly generated curve, derive an AES-128 key from
//! it, and move a message in both cipher modes.

use cipherkit::Result;
use cipherkit::aes::Aes128;
use cipherkit::{ecdh, keys, modes};

fn main() -> Result<()> {
    let params = ecdh::generate_curve_params(128);
    println!("curve: y^2 = x^3 + {}x + {} (mod {})", params.a, params.b, params.p);

    let alice_private = ecdh::generate_private_key(128);
    let bob_private = ecdh::generate_private_key(128);
    let alice_public = ecdh::public_key(&alice_private, &params)?;
    let bob_public = ecdh::public_key(&bob_private, &params)?;

    let alice_secret = ecdh::shared_secret(&alice_private, &bob_public, &params)?;
    let bob_secret = ecdh::shared_secret(&bob_private, &alice_public, &params)?;
    assert_eq!(alice_secret, bob_secret);
    println!("shared secret: {alice_secret}");

    let cipher = Aes128::new(&keys::derive_key(&alice_secret));
    let message = b"We need picnicc";

    let cbc_wire = modes::cbc_encrypt(&cipher, modes::random_iv(), message);
    println!("cbc: {} bytes on the wire", cbc_wire.len());
    assert_eq!(modes::cbc_decrypt(&cipher, &cbc_wire)?, message);

    let ctr_wire = modes::ctr_encrypt(&cipher, modes::random_iv(), message);
    println!("ctr: {} bytes on the wire", ctr_wire.len());
    assert_eq!(modes::ctr_decrypt(&cipher, &ctr_wire)?, message);

    println!("round trips ok");
    Ok(())
}
