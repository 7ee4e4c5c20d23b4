/// Address of the previously deployed Crypto Devs NFT contract on rinkeby.
/// The token contract checks NFT ownership against it when claiming.
pub const CRYPTO_DEVS_NFT_CONTRACT_ADDRESS: &str = "0x8a3c1d7f2e5b9460cd1e8b73a4f9025d6e1c7b38";
