use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use menugo_pix::{verify_payload, Amount, Checkout, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pix", about = "Generate and check PIX copia e cola payloads")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a payload for an amount in reais (`10`, `10.50`, `10,50`).
    Generate {
        amount: String,

        /// Transaction id; defaults to `***`.
        #[arg(long)]
        txid: Option<String>,

        /// TOML config file; merchant settings come from the environment otherwise.
        #[arg(long, short)]
        config: Option<PathBuf>,

        #[command(flatten)]
        merchant: MerchantFlags,

        /// Print the full charge as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Check the CRC of a payload and list its fields.
    Verify { payload: String },
}

/// Merchant settings given on the command line. They take precedence over
/// the config file and the environment, and can replace the environment
/// entirely.
#[derive(Args, Debug, Default)]
struct MerchantFlags {
    #[arg(long)]
    pix_key: Option<String>,

    #[arg(long)]
    merchant_name: Option<String>,

    #[arg(long)]
    merchant_city: Option<String>,
}

impl MerchantFlags {
    fn get(&self, key: &str) -> Option<String> {
        match key {
            "PIX_KEY" => self.pix_key.clone(),
            "PIX_MERCHANT_NAME" => self.merchant_name.clone(),
            "PIX_MERCHANT_CITY" => self.merchant_city.clone(),
            _ => None,
        }
    }

    fn load_config<F>(&self, path: Option<&Path>, env_lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(path) = path else {
            return Config::from_lookup(|key| self.get(key).or_else(|| env_lookup(key)))
                .context("loading merchant settings from flags and environment");
        };

        let mut config = Config::from_file(path).with_context(|| format!("loading {}", path.display()))?;
        if let Some(pix_key) = &self.pix_key {
            config.merchant.pix_key = pix_key.clone();
        }
        if let Some(name) = &self.merchant_name {
            config.merchant.merchant_name = name.clone();
        }
        if let Some(city) = &self.merchant_city {
            config.merchant.merchant_city = city.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Generate {
            amount,
            txid,
            config,
            merchant,
            json,
        } => {
            let config = merchant.load_config(config.as_deref(), |key| env::var(key).ok())?;

            let amount = Amount::parse(&amount)?;
            let checkout = Checkout::new(config)?;
            let charge = checkout.charge_amount(amount, txid.as_deref())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&charge)?);
            } else {
                println!("{}", charge.payload);
                println!("{}", charge.qr_code_url);
            }
        }
        Command::Verify { payload } => {
            let fields = verify_payload(&payload)?;
            for field in &fields {
                println!("{} {:02} {}", field.id, field.value.chars().count(), field.value);
                if field.id == "26" || field.id == "62" {
                    match field.nested() {
                        Ok(inner) => {
                            for sub in inner {
                                println!("   {} {:02} {}", sub.id, sub.value.chars().count(), sub.value);
                            }
                        }
                        Err(e) => bail!("field {} is not a TLV template: {e}", field.id),
                    }
                }
            }
            info!("Payload checksum OK ({} fields)", fields.len());
            println!("checksum OK");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn storefront_flags() -> MerchantFlags {
        MerchantFlags {
            pix_key: Some("07772321112".to_string()),
            merchant_name: Some("Kaua Henrique S De A".to_string()),
            merchant_city: Some("SAO PAULO".to_string()),
        }
    }

    #[test]
    fn test_flags_replace_environment() {
        let config = storefront_flags().load_config(None, no_env).unwrap();
        assert_eq!(config.merchant.pix_key, "07772321112");
        assert_eq!(config.merchant.merchant_city, "SAO PAULO");

        let charge = Checkout::new(config)
            .unwrap()
            .charge_amount(Amount::parse("10").unwrap(), None)
            .unwrap();
        assert!(charge.payload.ends_with("63044CA5"));
    }

    #[test]
    fn test_flags_override_environment_per_key() {
        let env_lookup = |key: &str| match key {
            "PIX_KEY" => Some("env-key".to_string()),
            "PIX_MERCHANT_NAME" => Some("Loja do Env".to_string()),
            "PIX_MERCHANT_CITY" => Some("RIO".to_string()),
            _ => None,
        };
        let flags = MerchantFlags {
            pix_key: Some("flag-key".to_string()),
            ..MerchantFlags::default()
        };

        let config = flags.load_config(None, env_lookup).unwrap();
        assert_eq!(config.merchant.pix_key, "flag-key");
        assert_eq!(config.merchant.merchant_name, "Loja do Env");
    }

    #[test]
    fn test_missing_merchant_settings() {
        let flags = MerchantFlags {
            pix_key: Some("k".to_string()),
            ..MerchantFlags::default()
        };
        let err = flags.load_config(None, no_env).unwrap_err();
        assert!(format!("{err:#}").contains("PIX_MERCHANT_NAME"));
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[merchant]\npix_key = \"file-key\"\nmerchant_name = \"Padaria Central\"\nmerchant_city = \"CAMPINAS\""
        )
        .unwrap();

        let flags = MerchantFlags {
            merchant_city: Some("SANTOS".to_string()),
            ..MerchantFlags::default()
        };
        let config = flags.load_config(Some(file.path()), no_env).unwrap();
        assert_eq!(config.merchant.pix_key, "file-key");
        assert_eq!(config.merchant.merchant_city, "SANTOS");
    }
}
