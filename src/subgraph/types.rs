//! Subgraph record types
//!
//! BigInt fields arrive as decimal strings and IDs as lowercase hex. Raw
//! records are parsed one at a time so a single malformed record can be
//! skipped without losing its page.

use super::pagination::{Nested, Timestamped};
use super::SubgraphError;
use alloy::primitives::{Address, U256};
use serde::Deserialize;
use serde_json::Value;

/// A draw with the prize claims recorded against it
#[derive(Debug, Clone, PartialEq)]
pub struct SubgraphDraw {
    pub id: u32,
    pub prize_claims: Vec<SubgraphPrize>,
}

/// A claimed prize
#[derive(Debug, Clone, PartialEq)]
pub struct SubgraphPrize {
    pub id: String,
    pub draw_id: u32,
    pub vault: Address,
    pub winner: Address,
    pub recipient: Address,
    pub tier: u8,
    pub prize_index: u32,
    pub payout: U256,
    pub claim_reward: U256,
    pub timestamp: u64,
}

impl Timestamped for SubgraphPrize {
    fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

/// One TWAB balance observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwabObservation {
    pub balance: U256,
    pub delegate_balance: U256,
    pub timestamp: u64,
    pub is_new: bool,
}

impl Timestamped for TwabObservation {
    fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

/// A user's observations within one vault
#[derive(Debug, Clone, PartialEq)]
pub struct VaultObservations {
    pub vault: Address,
    pub observations: Vec<TwabObservation>,
}

/// A parsed parent record with the bookkeeping needed by nested pagination
#[derive(Debug)]
pub(crate) struct Fetched<P> {
    pub record: P,
    /// Children present in the response, including ones that failed to parse
    pub children_returned: usize,
    pub errors: Vec<SubgraphError>,
}

impl<P> Nested for Fetched<P> {
    fn child_count(&self) -> usize {
        self.children_returned
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDraw {
    draw_id: u32,
    #[serde(default)]
    prize_claims: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawEntityRef {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDrawRef {
    draw_id: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPrizeClaim {
    id: String,
    draw: Option<RawDrawRef>,
    prize_vault: RawEntityRef,
    winner: String,
    recipient: String,
    tier: u8,
    prize_index: u32,
    payout: String,
    claim_reward: String,
    timestamp: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawObservation {
    balance: String,
    delegate_balance: String,
    timestamp: String,
    #[serde(default)]
    is_new: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAccount {
    prize_vault: RawEntityRef,
    #[serde(default)]
    observations: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    address: String,
}

fn invalid(what: &str, detail: impl std::fmt::Display) -> SubgraphError {
    SubgraphError::InvalidRecord(format!("{what}: {detail}"))
}

fn parse_address(field: &str, raw: &str) -> Result<Address, SubgraphError> {
    raw.parse().map_err(|e| invalid(field, e))
}

fn parse_uint(field: &str, raw: &str) -> Result<U256, SubgraphError> {
    raw.parse().map_err(|e| invalid(field, e))
}

fn parse_timestamp(raw: &str) -> Result<u64, SubgraphError> {
    raw.parse().map_err(|e| invalid("timestamp", e))
}

/// Parse a prize claim; `draw_id` overrides the claim's own draw reference
pub(crate) fn parse_prize(
    value: Value,
    draw_id: Option<u32>,
) -> Result<SubgraphPrize, SubgraphError> {
    let raw: RawPrizeClaim = serde_json::from_value(value).map_err(|e| invalid("prize claim", e))?;

    let draw_id = draw_id
        .or(raw.draw.map(|d| d.draw_id))
        .ok_or_else(|| invalid("prize claim", format!("{} has no draw", raw.id)))?;

    Ok(SubgraphPrize {
        draw_id,
        vault: parse_address("prizeVault", &raw.prize_vault.id)?,
        winner: parse_address("winner", &raw.winner)?,
        recipient: parse_address("recipient", &raw.recipient)?,
        tier: raw.tier,
        prize_index: raw.prize_index,
        payout: parse_uint("payout", &raw.payout)?,
        claim_reward: parse_uint("claimReward", &raw.claim_reward)?,
        timestamp: parse_timestamp(&raw.timestamp)?,
        id: raw.id,
    })
}

/// Parse a draw; malformed claims are dropped and kept as errors
pub(crate) fn parse_draw(value: Value) -> Result<Fetched<SubgraphDraw>, SubgraphError> {
    let raw: RawDraw = serde_json::from_value(value).map_err(|e| invalid("draw", e))?;
    let children_returned = raw.prize_claims.len();

    let (prize_claims, errors) = partition(
        raw.prize_claims
            .into_iter()
            .map(|claim| parse_prize(claim, Some(raw.draw_id))),
    );

    Ok(Fetched {
        record: SubgraphDraw {
            id: raw.draw_id,
            prize_claims,
        },
        children_returned,
        errors,
    })
}

pub(crate) fn parse_observation(value: Value) -> Result<TwabObservation, SubgraphError> {
    let raw: RawObservation =
        serde_json::from_value(value).map_err(|e| invalid("observation", e))?;

    Ok(TwabObservation {
        balance: parse_uint("balance", &raw.balance)?,
        delegate_balance: parse_uint("delegateBalance", &raw.delegate_balance)?,
        timestamp: parse_timestamp(&raw.timestamp)?,
        is_new: raw.is_new,
    })
}

/// Parse an account; malformed observations are dropped and kept as errors
pub(crate) fn parse_account(value: Value) -> Result<Fetched<VaultObservations>, SubgraphError> {
    let raw: RawAccount = serde_json::from_value(value).map_err(|e| invalid("account", e))?;
    let vault = parse_address("prizeVault", &raw.prize_vault.id)?;
    let children_returned = raw.observations.len();

    let (observations, errors) = partition(raw.observations.into_iter().map(parse_observation));

    Ok(Fetched {
        record: VaultObservations { vault, observations },
        children_returned,
        errors,
    })
}

pub(crate) fn parse_user(value: Value) -> Result<Address, SubgraphError> {
    let raw: RawUser = serde_json::from_value(value).map_err(|e| invalid("user", e))?;
    parse_address("address", &raw.address)
}

fn partition<T>(
    results: impl Iterator<Item = Result<T, SubgraphError>>,
) -> (Vec<T>, Vec<SubgraphError>) {
    let mut ok = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(value) => ok.push(value),
            Err(e) => errors.push(e),
        }
    }
    (ok, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use serde_json::json;

    fn claim_json(id: &str, timestamp: u64) -> Value {
        json!({
            "id": id,
            "prizeVault": { "id": "0x1111111111111111111111111111111111111111" },
            "winner": "0x2222222222222222222222222222222222222222",
            "recipient": "0x2222222222222222222222222222222222222222",
            "tier": 1,
            "prizeIndex": 3,
            "payout": "1500000000000000000",
            "claimReward": "1000",
            "timestamp": timestamp.to_string()
        })
    }

    #[test]
    fn test_parse_prize() {
        let prize = parse_prize(claim_json("c1", 1_700_000_000), Some(7)).unwrap();
        assert_eq!(prize.id, "c1");
        assert_eq!(prize.draw_id, 7);
        assert_eq!(prize.vault, address!("1111111111111111111111111111111111111111"));
        assert_eq!(prize.tier, 1);
        assert_eq!(prize.prize_index, 3);
        assert_eq!(prize.payout, U256::from(1_500_000_000_000_000_000u128));
        assert_eq!(prize.claim_reward, U256::from(1000));
        assert_eq!(prize.timestamp, 1_700_000_000);
    }

    #[test]
    fn test_parse_prize_uses_own_draw_reference() {
        let mut claim = claim_json("c1", 1);
        claim["draw"] = json!({ "drawId": 12 });
        assert_eq!(parse_prize(claim.clone(), None).unwrap().draw_id, 12);
        assert_eq!(parse_prize(claim, Some(3)).unwrap().draw_id, 3);

        assert!(parse_prize(claim_json("c2", 1), None).is_err());
    }

    #[test]
    fn test_parse_prize_rejects_bad_fields() {
        let mut claim = claim_json("c1", 1);
        claim["payout"] = json!("not a number");
        assert!(parse_prize(claim, Some(1)).is_err());

        let mut claim = claim_json("c1", 1);
        claim["winner"] = json!("0x1234");
        assert!(parse_prize(claim, Some(1)).is_err());
    }

    #[test]
    fn test_parse_draw_skips_bad_claims() {
        let mut bad = claim_json("bad", 2);
        bad["timestamp"] = json!("yesterday");

        let value = json!({
            "id": "0x05",
            "drawId": 5,
            "prizeClaims": [claim_json("good", 1), bad]
        });

        let fetched = parse_draw(value).unwrap();
        assert_eq!(fetched.record.id, 5);
        assert_eq!(fetched.record.prize_claims.len(), 1);
        assert_eq!(fetched.record.prize_claims[0].draw_id, 5);
        assert_eq!(fetched.errors.len(), 1);
        // The dropped claim still counts towards the page
        assert_eq!(fetched.child_count(), 2);
    }

    #[test]
    fn test_parse_draw_without_claims() {
        let fetched = parse_draw(json!({ "id": "0x01", "drawId": 1 })).unwrap();
        assert!(fetched.record.prize_claims.is_empty());
        assert!(fetched.errors.is_empty());
        assert_eq!(fetched.child_count(), 0);
    }

    #[test]
    fn test_parse_account() {
        let value = json!({
            "id": "acct",
            "prizeVault": { "id": "0x1111111111111111111111111111111111111111" },
            "observations": [
                { "balance": "10", "delegateBalance": "10", "timestamp": "100", "isNew": true },
                { "balance": "20", "delegateBalance": "15", "timestamp": "200" }
            ]
        });

        let fetched = parse_account(value).unwrap();
        assert!(fetched.errors.is_empty());
        let account = fetched.record;
        assert_eq!(account.observations.len(), 2);
        assert!(account.observations[0].is_new);
        assert!(!account.observations[1].is_new);
        assert_eq!(account.observations[1].delegate_balance, U256::from(15));
    }

    #[test]
    fn test_parse_user() {
        let value = json!({ "id": "x", "address": "0x3333333333333333333333333333333333333333" });
        let address = parse_user(value).unwrap();
        assert_eq!(address, address!("3333333333333333333333333333333333333333"));
        assert!(parse_user(json!({ "id": "x" })).is_err());
    }
}
