//! Hex digests and HMACs. Both hash the canonical UTF-8 text of their input, so the number `3`
//! and the string `"3"` produce the same digest.
use super::arity;
use crate::errors::{Error, Result};
use crate::registry::Registry;
use crate::value;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use md5::Md5;
use serde_json::Value;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

#[inline]
fn canonical_bytes(value: &Value) -> Vec<u8> {
    value::text(value).into_bytes()
}

fn digest_hex<D: Digest>(value: &Value) -> Value {
    Value::String(hex::encode(D::digest(canonical_bytes(value))))
}

fn hmac_hex<M: Mac + KeyInit>(message: &Value, key: &Value) -> Result<Value> {
    let mut mac = <M as KeyInit>::new_from_slice(&canonical_bytes(key))
        .map_err(|e| Error::invalid_arguments(format!("invalid hmac key: {}", e)))?;
    mac.update(&canonical_bytes(message));
    Ok(Value::String(hex::encode(mac.finalize().into_bytes())))
}

macro_rules! hash_functions {
    ($registry:expr, $($name:literal => $algorithm:ty),+ $(,)?) => {
        $(
            $registry
                .register_maybe($name, |v: &Value, args: &[Value]| {
                    arity(args, 0)?;
                    Ok(digest_hex::<$algorithm>(v))
                })
                .register_maybe(concat!("hmac_", $name), |v: &Value, args: &[Value]| {
                    arity(args, 1)?;
                    hmac_hex::<Hmac<$algorithm>>(v, &args[0])
                });
        )+
    };
}

pub(crate) fn install(registry: &mut Registry) {
    hash_functions!(registry,
        "md5" => Md5,
        "sha1" => Sha1,
        "sha224" => Sha224,
        "sha256" => Sha256,
        "sha384" => Sha384,
        "sha512" => Sha512,
    );
}
