//! Decoding of the fixed-width hexadecimal tokens in kernel socket tables.
//!
//! The kernel renders addresses in host (little-endian) word order: an IPv4
//! address is one 32-bit word, an IPv6 address four consecutive 32-bit words,
//! each printed as fixed-width hex. The byte-order reversal happens here,
//! once, so address rendering is consistent across all four tables.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::{Error, Result};

/// Parses a hexadecimal token as an unsigned 32-bit integer.
///
/// # Errors
///
/// Returns [`Error::MalformedEntry`] when the token is empty, contains
/// non-hex characters, or exceeds 32 bits.
pub fn hex_to_int(token: &str) -> Result<u32> {
    u32::from_str_radix(token, 16)
        .map_err(|err| Error::malformed_entry(format!("bad hex token '{token}': {err}")))
}

/// Parses a hexadecimal port token.
///
/// # Errors
///
/// Returns [`Error::MalformedEntry`] when the token is not hex or exceeds
/// 16 bits.
pub fn decode_port(token: &str) -> Result<u16> {
    u16::from_str_radix(token, 16)
        .map_err(|err| Error::malformed_entry(format!("bad port token '{token}': {err}")))
}

/// Decodes a packed hexadecimal address token into a typed IP address.
///
/// The token length selects the family: 8 hex characters decode as a single
/// little-endian IPv4 word, 32 as four consecutive little-endian 32-bit IPv6
/// words.
///
/// # Errors
///
/// Returns [`Error::MalformedEntry`] for any other length or for non-hex
/// content.
pub fn decode_address(token: &str) -> Result<IpAddr> {
    match token.len() {
        8 => Ok(IpAddr::V4(Ipv4Addr::from(hex_to_int(token)?.to_le_bytes()))),
        32 => {
            let mut octets = [0u8; 16];
            for (i, chunk) in token.as_bytes().chunks(8).enumerate() {
                let word = std::str::from_utf8(chunk).map_err(|_| {
                    Error::malformed_entry(format!("bad address token '{token}'"))
                })?;
                octets[i * 4..(i + 1) * 4].copy_from_slice(&hex_to_int(word)?.to_le_bytes());
            }
            Ok(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        n => Err(Error::malformed_entry(format!(
            "address token '{token}' has length {n}, expected 8 or 32"
        ))),
    }
}

/// Renders an IPv6 address in the uncompressed eight-group form.
///
/// [`Ipv6Addr`]'s own `Display` compresses zero runs; the expanded form keeps
/// every group at four hex digits.
#[must_use]
pub fn expand_ipv6(addr: &Ipv6Addr) -> String {
    let s = addr.segments();
    format!(
        "{:04x}:{:04x}:{:04x}:{:04x}:{:04x}:{:04x}:{:04x}:{:04x}",
        s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_v4(addr: Ipv4Addr) -> String {
        format!("{:08X}", u32::from_le_bytes(addr.octets()))
    }

    #[test]
    fn hex_to_int_decodes_port_values() {
        assert_eq!(hex_to_int("0050").unwrap(), 80);
        assert_eq!(hex_to_int("1F90").unwrap(), 8080);
        assert_eq!(hex_to_int("0000").unwrap(), 0);
        assert_eq!(hex_to_int("FFFFFFFF").unwrap(), u32::MAX);
    }

    #[test]
    fn hex_to_int_rejects_non_hex_tokens() {
        assert!(hex_to_int("ZZZZ").is_err());
        assert!(hex_to_int("").is_err());
        assert!(hex_to_int("0x50").is_err());
        assert!(hex_to_int("123456789").is_err()); // 33 bits
    }

    #[test]
    fn decode_port_bounds_to_sixteen_bits() {
        assert_eq!(decode_port("0050").unwrap(), 80);
        assert_eq!(decode_port("1F90").unwrap(), 8080);
        assert_eq!(decode_port("FFFF").unwrap(), 65535);
        assert!(decode_port("10000").is_err());
        assert!(decode_port("00GG").is_err());
    }

    #[test]
    fn ipv4_tokens_reverse_byte_order() {
        assert_eq!(
            decode_address("0100007F").unwrap(),
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
        );
        assert_eq!(
            decode_address("00000000").unwrap(),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
        assert_eq!(
            decode_address("0501A8C0").unwrap(),
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 5))
        );
        assert_eq!(
            decode_address("FFFFFFFF").unwrap(),
            IpAddr::V4(Ipv4Addr::new(255, 255, 255, 255))
        );
    }

    #[test]
    fn ipv4_round_trips_through_the_packed_form() {
        for addr in [
            Ipv4Addr::new(127, 0, 0, 1),
            Ipv4Addr::new(192, 168, 1, 5),
            Ipv4Addr::new(8, 8, 8, 8),
            Ipv4Addr::new(255, 255, 255, 255),
        ] {
            assert_eq!(decode_address(&encode_v4(addr)).unwrap(), IpAddr::V4(addr));
        }
    }

    #[test]
    fn ipv6_tokens_decode_as_four_little_endian_words() {
        assert_eq!(
            decode_address("00000000000000000000000001000000").unwrap(),
            "::1".parse::<IpAddr>().unwrap()
        );
        assert_eq!(
            decode_address("00000000000000000000000000000000").unwrap(),
            "::".parse::<IpAddr>().unwrap()
        );
        assert_eq!(
            decode_address("0000000000000000FFFF00000100007F").unwrap(),
            "::ffff:127.0.0.1".parse::<IpAddr>().unwrap()
        );
        assert_eq!(
            decode_address("B80D0120000000000000000001000000").unwrap(),
            "2001:db8::1".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn other_token_lengths_are_malformed() {
        for token in [
            "",
            "0100007",
            "0100007F0",
            "0000000000000000FFFF00000100007",
            "0000000000000000FFFF00000100007F0",
        ] {
            assert!(decode_address(token).is_err(), "token {token:?}");
        }
    }

    #[test]
    fn non_ascii_tokens_fail_without_panicking() {
        // 32 bytes with a multibyte char straddling a word boundary
        let token = format!("aaaaaaa\u{e9}{}", "a".repeat(23));
        assert_eq!(token.len(), 32);
        assert!(decode_address(&token).is_err());
    }

    #[test]
    fn expanded_ipv6_has_eight_four_digit_groups() {
        let addr = match decode_address("00000000000000000000000001000000").unwrap() {
            IpAddr::V6(v6) => v6,
            IpAddr::V4(_) => panic!("expected v6"),
        };
        let rendered = expand_ipv6(&addr);
        assert_eq!(rendered, "0000:0000:0000:0000:0000:0000:0000:0001");
        let groups: Vec<&str> = rendered.split(':').collect();
        assert_eq!(groups.len(), 8);
        assert!(groups.iter().all(|g| g.len() == 4));
    }

    #[test]
    fn expanded_ipv6_keeps_leading_zeros() {
        let addr: Ipv6Addr = "2001:db8::1".parse().unwrap();
        assert_eq!(
            expand_ipv6(&addr),
            "2001:0db8:0000:0000:0000:0000:0000:0001"
        );
    }
}
