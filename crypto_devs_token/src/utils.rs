use anyhow::{anyhow, ensure, Context};
use ethers::{types::Address, utils::to_checksum};

/// parse a `0x` prefixed, 20 byte hex address. Mixed case input has to carry
/// a valid EIP-55 checksum, all lower or upper case input is taken as is.
pub fn parse_address(address: &str) -> anyhow::Result<Address> {
    let hex_str = address
        .strip_prefix("0x")
        .ok_or_else(|| anyhow!("address `{address}` is missing the 0x prefix"))?;
    let bytes = hex::decode(hex_str).with_context(|| format!("address `{address}` is not hex"))?;
    ensure!(
        bytes.len() == Address::len_bytes(),
        "address `{address}` is {} bytes long, expected {}",
        bytes.len(),
        Address::len_bytes()
    );

    let parsed = Address::from_slice(&bytes);
    let mixed_case = hex_str.chars().any(|c| c.is_ascii_lowercase())
        && hex_str.chars().any(|c| c.is_ascii_uppercase());
    ensure!(
        !mixed_case || to_checksum(&parsed, None) == address,
        "bad address checksum for `{address}`"
    );

    Ok(parsed)
}

/// EIP-55 checksummed form.
// note that the fmt::Display of an address truncates it, so it can't be used here
pub fn display_address(address: &Address) -> String {
    to_checksum(address, None)
}
