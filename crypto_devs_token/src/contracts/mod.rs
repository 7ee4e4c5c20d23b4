pub mod crypto_dev_token;
