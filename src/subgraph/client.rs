//! Subgraph client
//!
//! Every query walks pages sequentially. A chain without a configured
//! subgraph yields an empty result and a warning rather than an error.

use super::pagination::{
    append_time_ordered, collect_pages, collect_time_ordered_pages, walk_nested_pages, Page,
    ParentAccumulator,
};
use super::queries::{
    self, ACCOUNTS_ROOT, DRAWS_ROOT, PRIZE_CLAIMS_ROOT, USERS_ROOT, VAULT_OBSERVATIONS_ROOT,
};
use super::types::{
    parse_account, parse_draw, parse_observation, parse_prize, parse_user, Fetched,
};
use super::{extract_root, GraphQlRequest, SubgraphError, SubgraphTransport};
use super::{SubgraphDraw, SubgraphPrize, TwabObservation, VaultObservations};
use crate::config::{ChainRegistry, DEFAULT_PAGE_SIZE};
use crate::telemetry::{increment_counter, CounterMetric};
use alloy::primitives::Address;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Client for the prize protocol subgraphs of all configured chains
pub struct SubgraphClient<T> {
    registry: Arc<ChainRegistry>,
    transport: T,
    page_size: usize,
}

impl<T: SubgraphTransport> SubgraphClient<T> {
    pub fn new(registry: Arc<ChainRegistry>, transport: T) -> Self {
        Self {
            registry,
            transport,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the number of records requested per page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// All draws with their prize claims, ascending by draw ID
    pub async fn get_paginated_draws(
        &self,
        chain_id: u64,
    ) -> Result<Vec<SubgraphDraw>, SubgraphError> {
        let Some(url) = self.endpoint(chain_id) else {
            return Ok(Vec::new());
        };

        let mut draws: ParentAccumulator<u32, SubgraphDraw> = ParentAccumulator::new();

        walk_nested_pages(
            self.page_size,
            move |draw_page, claim_page| async move {
                let request = queries::draws_query(draw_page, claim_page);
                let values = self.fetch_root(chain_id, url, &request, DRAWS_ROOT).await?;
                Ok(self.parse_page(chain_id, values, parse_draw))
            },
            |page: Vec<Fetched<SubgraphDraw>>| {
                for fetched in page {
                    let draw = self.take_record(chain_id, fetched);
                    draws.merge(draw.id, draw, |existing, more| {
                        existing.prize_claims.extend(more.prize_claims)
                    });
                }
            },
        )
        .await?;

        let mut draws = draws.into_vec();
        draws.sort_by_key(|d| d.id);
        for draw in &mut draws {
            draw.prize_claims.sort_by_key(|c| c.timestamp);
        }

        tracing::info!(chain_id, draws = draws.len(), "Fetched draws from subgraph");
        Ok(draws)
    }

    /// Prize claims won by `user`, ascending by timestamp
    pub async fn get_user_prizes(
        &self,
        chain_id: u64,
        user: Address,
    ) -> Result<Vec<SubgraphPrize>, SubgraphError> {
        let Some(url) = self.endpoint(chain_id) else {
            return Ok(Vec::new());
        };

        let prizes = collect_pages(self.page_size, move |page| async move {
            let request = queries::user_prizes_query(user, page);
            let values = self
                .fetch_root(chain_id, url, &request, PRIZE_CLAIMS_ROOT)
                .await?;
            Ok(self.parse_flat_page(chain_id, values, |v| parse_prize(v, None)))
        })
        .await?;

        // Several prizes can share a timestamp, so duplicates are matched by ID
        let mut seen = HashSet::new();
        let mut prizes: Vec<SubgraphPrize> = prizes
            .into_iter()
            .filter(|p| seen.insert(p.id.clone()))
            .collect();
        prizes.sort_by_key(|p| p.timestamp);

        tracing::info!(chain_id, %user, prizes = prizes.len(), "Fetched user prizes from subgraph");
        Ok(prizes)
    }

    /// TWAB observations of `user`, grouped by vault
    pub async fn get_user_observations(
        &self,
        chain_id: u64,
        user: Address,
    ) -> Result<Vec<VaultObservations>, SubgraphError> {
        let Some(url) = self.endpoint(chain_id) else {
            return Ok(Vec::new());
        };

        let mut vaults: ParentAccumulator<Address, VaultObservations> = ParentAccumulator::new();

        walk_nested_pages(
            self.page_size,
            move |account_page, observation_page| async move {
                let request =
                    queries::user_observations_query(user, account_page, observation_page);
                let values = self.fetch_root(chain_id, url, &request, ACCOUNTS_ROOT).await?;
                Ok(self.parse_page(chain_id, values, parse_account))
            },
            |page: Vec<Fetched<VaultObservations>>| {
                for fetched in page {
                    let account = self.take_record(chain_id, fetched);
                    vaults.merge(account.vault, account, |existing, more| {
                        append_time_ordered(&mut existing.observations, more.observations)
                    });
                }
            },
        )
        .await?;

        let mut vaults = vaults.into_vec();
        for vault in &mut vaults {
            vault.observations.sort_by_key(|o| o.timestamp);
        }

        tracing::info!(
            chain_id,
            %user,
            vaults = vaults.len(),
            "Fetched user observations from subgraph"
        );
        Ok(vaults)
    }

    /// Total supply observations of one vault, ascending by timestamp
    pub async fn get_vault_observations(
        &self,
        chain_id: u64,
        vault: Address,
    ) -> Result<Vec<TwabObservation>, SubgraphError> {
        let Some(url) = self.endpoint(chain_id) else {
            return Ok(Vec::new());
        };

        let mut observations = collect_time_ordered_pages(self.page_size, move |page| async move {
            let request = queries::vault_observations_query(vault, page);
            let values = self
                .fetch_root(chain_id, url, &request, VAULT_OBSERVATIONS_ROOT)
                .await?;
            Ok(self.parse_flat_page(chain_id, values, parse_observation))
        })
        .await?;
        observations.sort_by_key(|o| o.timestamp);

        tracing::info!(
            chain_id,
            %vault,
            observations = observations.len(),
            "Fetched vault observations from subgraph"
        );
        Ok(observations)
    }

    /// Every depositor wallet address, de-duplicated in first-seen order
    pub async fn get_wallet_addresses(&self, chain_id: u64) -> Result<Vec<Address>, SubgraphError> {
        let Some(url) = self.endpoint(chain_id) else {
            return Ok(Vec::new());
        };

        let addresses = collect_pages(self.page_size, move |page| async move {
            let request = queries::users_query(page);
            let values = self.fetch_root(chain_id, url, &request, USERS_ROOT).await?;
            Ok(self.parse_flat_page(chain_id, values, parse_user))
        })
        .await?;

        let mut seen = HashSet::new();
        let addresses: Vec<Address> = addresses.into_iter().filter(|a| seen.insert(*a)).collect();

        tracing::info!(
            chain_id,
            wallets = addresses.len(),
            "Fetched wallet addresses from subgraph"
        );
        Ok(addresses)
    }

    fn endpoint(&self, chain_id: u64) -> Option<&str> {
        let url = self.registry.subgraph_url(chain_id);
        if url.is_none() {
            tracing::warn!(chain_id, "No subgraph configured for chain, returning empty result");
        }
        url
    }

    async fn fetch_root(
        &self,
        chain_id: u64,
        url: &str,
        request: &GraphQlRequest,
        root: &str,
    ) -> Result<Vec<Value>, SubgraphError> {
        increment_counter(CounterMetric::SubgraphPages, chain_id, 1);

        let response = self.transport.post(url, request).await?;

        if let Some(errors) = response.get("errors") {
            tracing::warn!(chain_id, root, errors = %errors, "Subgraph query returned errors");
        }

        let items = extract_root(&response, root);
        tracing::debug!(
            chain_id,
            root,
            variables = %request.variables,
            count = items.len(),
            "Fetched subgraph page"
        );

        Ok(items)
    }

    /// Parse parent records, dropping those that fail
    fn parse_page<P>(
        &self,
        chain_id: u64,
        values: Vec<Value>,
        parse: impl Fn(Value) -> Result<Fetched<P>, SubgraphError>,
    ) -> Page<Fetched<P>> {
        let returned = values.len();
        let items = values
            .into_iter()
            .filter_map(|v| match parse(v) {
                Ok(fetched) => Some(fetched),
                Err(e) => {
                    self.report_invalid(chain_id, &e);
                    None
                }
            })
            .collect();

        Page::new(items, returned)
    }

    /// Parse flat records, dropping those that fail
    fn parse_flat_page<R>(
        &self,
        chain_id: u64,
        values: Vec<Value>,
        parse: impl Fn(Value) -> Result<R, SubgraphError>,
    ) -> Page<R> {
        let returned = values.len();
        let items = values
            .into_iter()
            .filter_map(|v| match parse(v) {
                Ok(record) => Some(record),
                Err(e) => {
                    self.report_invalid(chain_id, &e);
                    None
                }
            })
            .collect();

        Page::new(items, returned)
    }

    /// Unwrap a parent, reporting any children that failed to parse
    fn take_record<P>(&self, chain_id: u64, fetched: Fetched<P>) -> P {
        for error in &fetched.errors {
            self.report_invalid(chain_id, error);
        }
        fetched.record
    }

    fn report_invalid(&self, chain_id: u64, error: &SubgraphError) {
        tracing::warn!(chain_id, error = %error, "Skipping invalid subgraph record");
        increment_counter(CounterMetric::SubgraphRecordsSkipped, chain_id, 1);
    }
}
