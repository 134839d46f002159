//! Subcommand execution.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use pricebook_core::currency::{
    CurrencyError, FeeSchedule, apply_markup, format_price, try_convert,
};
use pricebook_core::registry::{CurrencyRegistry, RegistryError};
use pricebook_rates::{
    CurrencyStore, FileRatesProvider, RatesError, Snapshot, provider_from_config,
};
use pricebook_shared::config::RatesSource;
use pricebook_shared::{AppConfig, AppError, CurrencyCode, coerce_amount};
use rust_decimal::Decimal;
use serde_json::json;

use crate::cli::{Args, Commands};

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("`{0}` edits the rates snapshot and needs rates.source = \"file\"")]
    FileSourceRequired(&'static str),

    #[error("Snapshot {} already exists", .0.display())]
    SnapshotExists(PathBuf),
}

impl From<CliError> for AppError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::FileSourceRequired(_) => Self::Configuration(err.to_string()),
            CliError::SnapshotExists(_) => Self::Conflict(err.to_string()),
        }
    }
}

/// Recovers the typed error behind a failed command.
///
/// Context added with `anyhow` is kept in the message; errors of unknown
/// type become [`AppError::Internal`].
pub fn into_app_error(err: anyhow::Error) -> AppError {
    let message = format!("{err:#}");
    let err = match err.downcast::<AppError>() {
        Ok(app) => return app,
        Err(err) => err,
    };
    let err = match err.downcast::<RatesError>() {
        Ok(rates) => return rates.into(),
        Err(err) => err,
    };
    let err = match err.downcast::<CurrencyError>() {
        Ok(currency) => return currency.into(),
        Err(err) => err,
    };
    let err = match err.downcast::<RegistryError>() {
        Ok(registry) => return registry.into(),
        Err(err) => err,
    };
    let err = match err.downcast::<CliError>() {
        Ok(cli) => return cli.into(),
        Err(err) => err,
    };
    match err.downcast::<serde_json::Error>() {
        Ok(_) => AppError::Validation(message),
        Err(_) => AppError::Internal(message),
    }
}

impl Args {
    pub async fn evaluate(self, config: &AppConfig) -> anyhow::Result<()> {
        let json = self.json;
        match self.command {
            Commands::Rates => {
                let store = load_store(config).await?;
                print_rates(json, &store).await?;
            }
            Commands::Convert {
                amount,
                from,
                to,
                strict,
            } => {
                let store = load_store(config).await?;
                let converter = store.converter().await?;

                let amount = coerce_amount(&amount);
                let from = from.map_or_else(|| converter.base().clone(), CurrencyCode::new);
                let to = CurrencyCode::new(&to);

                let converted = if strict {
                    try_convert(amount, &from, &to, converter.rates().as_slice(), converter.base())?
                } else {
                    converter.convert_between(amount, &from, &to)
                };
                let result = converter
                    .currency(&to)
                    .map_or(converted, |currency| currency.round(converted));

                if json {
                    let rate = converter.rate(&from, &to);
                    println!(
                        "{}",
                        json!({
                            "from": from,
                            "to": to,
                            "amount": amount.to_string(),
                            "rate": rate.map(|r| r.to_string()),
                            "result": result.to_string(),
                        })
                    );
                } else {
                    println!("{amount} {from} = {result} {to}");
                }
            }
            Commands::Format {
                amount,
                precision,
                rounding,
            } => {
                let result = format_price(coerce_amount(&amount), precision, rounding.into());
                print_amount(json, result);
            }
            Commands::Markup { value, fee } => {
                let fee = read_fee(&fee).await?;
                let result = apply_markup(coerce_amount(&value), &fee);
                print_amount(json, result);
            }
            Commands::SetRate {
                from,
                to,
                rate,
                commission,
            } => {
                let (from, to) = (CurrencyCode::new(&from), CurrencyCode::new(&to));
                let (rate, commission) = (coerce_amount(&rate), coerce_amount(&commission));
                edit_snapshot(config, "set-rate", |registry| {
                    if registry.rates().get(&from, &to).is_some() {
                        registry.update_rate(&from, &to, rate, commission)
                    } else {
                        registry.create_rate(&from, &to, rate, commission)
                    }
                })
                .await?;
                println!("{from} -> {to} = {rate}");
            }
            Commands::DeleteRate { from, to } => {
                let (from, to) = (CurrencyCode::new(&from), CurrencyCode::new(&to));
                edit_snapshot(config, "delete-rate", |registry| {
                    registry.delete_rate(&from, &to).map(|_| ())
                })
                .await?;
                println!("{from} -> {to} deleted");
            }
            Commands::SetDefault { id } => {
                edit_snapshot(config, "set-default", |registry| registry.change_default(id)).await?;
                println!("Currency {id} is now the default currency");
            }
            Commands::Init { path } => {
                let path = path.unwrap_or_else(|| PathBuf::from(&config.rates.path));
                if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                    return Err(CliError::SnapshotExists(path).into());
                }
                FileRatesProvider::new(&path)
                    .save(&Snapshot::from_registry(&CurrencyRegistry::new()))
                    .await?;
                println!("Created {}", path.display());
            }
        }

        Ok(())
    }
}

async fn load_store(config: &AppConfig) -> anyhow::Result<CurrencyStore> {
    let provider = provider_from_config(&config.rates)?;
    let store = CurrencyStore::new(provider).with_pricing(&config.pricing);
    store.refresh(false).await?;
    Ok(store)
}

async fn print_rates(json: bool, store: &CurrencyStore) -> anyhow::Result<()> {
    let default = store.default_currency().await;
    let currencies = store.currencies().await;
    let rates = store.rates().await;

    if json {
        let out = json!({
            "default": default,
            "refreshed_at": store.refreshed_at().await,
            "currencies": currencies,
            "rates": rates,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    match &default {
        Some(code) => println!("Default currency: {code}"),
        None => println!("Default currency: none"),
    }
    println!();
    for currency in &currencies {
        let marker = if currency.default { "*" } else { " " };
        println!(
            "{marker} {:>3} {:<6} {:<24} precision={} rounding={:?}",
            currency.id, currency.code, currency.title, currency.precision, currency.rounding
        );
    }
    println!();
    for edge in &rates {
        if edge.commission.is_zero() {
            println!("{} -> {} {}", edge.from, edge.to, edge.rate);
        } else {
            println!(
                "{} -> {} {} (+{}%)",
                edge.from, edge.to, edge.rate, edge.commission
            );
        }
    }
    Ok(())
}

fn print_amount(json: bool, amount: Decimal) {
    if json {
        println!("{}", json!({ "result": amount.to_string() }));
    } else {
        println!("{amount}");
    }
}

/// Parses a fee schedule given inline or as a file path.
async fn read_fee(arg: &str) -> anyhow::Result<FeeSchedule> {
    let raw = if arg.trim_start().starts_with('{') {
        arg.to_string()
    } else {
        tokio::fs::read_to_string(Path::new(arg))
            .await
            .with_context(|| format!("Failed to read fee schedule {arg}"))?
    };
    serde_json::from_str(&raw).context("Invalid fee schedule")
}

async fn edit_snapshot<F>(config: &AppConfig, command: &'static str, edit: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut CurrencyRegistry) -> Result<(), RegistryError>,
{
    if config.rates.source != RatesSource::File {
        return Err(CliError::FileSourceRequired(command).into());
    }

    let provider = FileRatesProvider::new(&config.rates.path);
    let mut registry = provider.load().await?.into_registry();
    edit(&mut registry)?;
    provider.save(&Snapshot::from_registry(&registry)).await?;
    Ok(())
}
