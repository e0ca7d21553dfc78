//! Micro-Ticket Prospecting API Library
//!
//! This library provides the service side of an equipment-finance prospecting
//! dashboard: place search and detail relays, contact-data enrichment with
//! relevance filtering and deal-fit scoring, an equipment recommendation
//! catalog, CSV export, a subscription access gate, and the payment webhook
//! that activates broker accounts.
//!
//! # Modules
//!
//! - `access`: Subscription access gate rule.
//! - `broker_store`: Broker profile storage operations.
//! - `cache_validator`: Cache validation utilities.
//! - `catalog`: Industry keyword and equipment suggestion tables.
//! - `circuit_breaker`: Circuit breaker for the enrichment provider.
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `enrichment`: Prospect enrichment pipeline.
//! - `errors`: Error handling types.
//! - `export`: CSV export of enriched prospects.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `services`: External provider clients (places, contact enrichment).
//! - `stripe_client`: Payment-processor API client.
//! - `webhook_handler`: Payment webhook handler.
//! - `webhook_models`: Payment webhook payload models.

pub mod access;
pub mod broker_store;
pub mod cache_validator;
pub mod catalog;
pub mod circuit_breaker;
pub mod config;
pub mod db;
pub mod enrichment;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod services;
pub mod stripe_client;
pub mod webhook_handler;
pub mod webhook_models;
