//! GraphQL documents and variable builders

use super::pagination::PageCursor;
use super::GraphQlRequest;
use alloy::primitives::{hex, Address};
use serde_json::json;

pub(crate) const DRAWS_ROOT: &str = "draws";
pub(crate) const PRIZE_CLAIMS_ROOT: &str = "prizeClaims";
pub(crate) const ACCOUNTS_ROOT: &str = "accounts";
pub(crate) const VAULT_OBSERVATIONS_ROOT: &str = "vaultObservations";
pub(crate) const USERS_ROOT: &str = "users";

const PRIZE_CLAIM_FIELDS: &str = r#"
      id
      prizeVault { id }
      winner
      recipient
      tier
      prizeIndex
      payout
      claimReward
      timestamp"#;

const OBSERVATION_FIELDS: &str = r#"
      balance
      delegateBalance
      timestamp
      isNew"#;

/// Subgraph IDs and address filters are lowercase hex
pub(crate) fn address_variable(address: Address) -> String {
    hex::encode_prefixed(address)
}

pub(crate) fn draws_query(draws: PageCursor, claims: PageCursor) -> GraphQlRequest {
    let query = format!(
        r#"query drawsWithClaims($first: Int, $skip: Int, $claimsFirst: Int, $claimsSkip: Int) {{
  draws(first: $first, skip: $skip, orderDirection: asc, orderBy: drawId) {{
    id
    drawId
    prizeClaims(first: $claimsFirst, skip: $claimsSkip, orderDirection: asc, orderBy: timestamp) {{{PRIZE_CLAIM_FIELDS}
    }}
  }}
}}"#
    );

    GraphQlRequest::new(
        query,
        json!({
            "first": draws.first,
            "skip": draws.skip,
            "claimsFirst": claims.first,
            "claimsSkip": claims.skip,
        }),
    )
}

pub(crate) fn user_prizes_query(user: Address, page: PageCursor) -> GraphQlRequest {
    let query = format!(
        r#"query userPrizeClaims($winner: Bytes, $first: Int, $skip: Int) {{
  prizeClaims(where: {{ winner: $winner }}, first: $first, skip: $skip, orderDirection: asc, orderBy: timestamp) {{
    draw {{ drawId }}{PRIZE_CLAIM_FIELDS}
  }}
}}"#
    );

    GraphQlRequest::new(
        query,
        json!({
            "winner": address_variable(user),
            "first": page.first,
            "skip": page.skip,
        }),
    )
}

pub(crate) fn user_observations_query(
    user: Address,
    accounts: PageCursor,
    observations: PageCursor,
) -> GraphQlRequest {
    let query = format!(
        r#"query userObservations($user: String, $first: Int, $skip: Int, $observationsFirst: Int, $observationsSkip: Int) {{
  accounts(where: {{ user: $user }}, first: $first, skip: $skip, orderDirection: asc, orderBy: id) {{
    id
    prizeVault {{ id }}
    observations(first: $observationsFirst, skip: $observationsSkip, orderDirection: asc, orderBy: timestamp) {{{OBSERVATION_FIELDS}
    }}
  }}
}}"#
    );

    GraphQlRequest::new(
        query,
        json!({
            "user": address_variable(user),
            "first": accounts.first,
            "skip": accounts.skip,
            "observationsFirst": observations.first,
            "observationsSkip": observations.skip,
        }),
    )
}

pub(crate) fn vault_observations_query(vault: Address, page: PageCursor) -> GraphQlRequest {
    let query = format!(
        r#"query vaultObservations($vault: String, $first: Int, $skip: Int) {{
  vaultObservations(where: {{ prizeVault: $vault }}, first: $first, skip: $skip, orderDirection: asc, orderBy: timestamp) {{{OBSERVATION_FIELDS}
  }}
}}"#
    );

    GraphQlRequest::new(
        query,
        json!({
            "vault": address_variable(vault),
            "first": page.first,
            "skip": page.skip,
        }),
    )
}

pub(crate) fn users_query(page: PageCursor) -> GraphQlRequest {
    let query = r#"query walletAddresses($first: Int, $skip: Int) {
  users(first: $first, skip: $skip, orderDirection: asc, orderBy: id) {
    id
    address
  }
}"#;

    GraphQlRequest::new(
        query,
        json!({
            "first": page.first,
            "skip": page.skip,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_address_variable_lowercase() {
        let user = address!("cA11bde05977b3631167028862bE2a173976CA11");
        assert_eq!(
            address_variable(user),
            "0xca11bde05977b3631167028862be2a173976ca11"
        );
    }

    #[test]
    fn test_draws_query_variables() {
        let draws = PageCursor { skip: 1000, first: 1000 };
        let claims = PageCursor { skip: 2000, first: 1000 };
        let request = draws_query(draws, claims);

        assert!(request.query.contains("draws(first: $first, skip: $skip"));
        assert!(request.query.contains("prizeClaims(first: $claimsFirst"));
        assert!(request.query.contains("claimReward"));
        assert_eq!(request.variables["skip"], 1000);
        assert_eq!(request.variables["claimsSkip"], 2000);
        assert_eq!(request.variables["claimsFirst"], 1000);
    }

    #[test]
    fn test_user_queries_filter_by_lowercase_address() {
        let user = address!("cA11bde05977b3631167028862bE2a173976CA11");
        let page = PageCursor::first_page(100);

        let prizes = user_prizes_query(user, page);
        assert_eq!(
            prizes.variables["winner"],
            "0xca11bde05977b3631167028862be2a173976ca11"
        );
        assert!(prizes.query.contains("draw { drawId }"));

        let observations = user_observations_query(user, page, page.next());
        assert_eq!(observations.variables["observationsSkip"], 100);
        assert!(observations.query.contains("accounts(where: { user: $user }"));
    }

    #[test]
    fn test_users_query_serializes() {
        let request = users_query(PageCursor::first_page(10));
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["variables"]["first"], 10);
        assert!(body["query"].as_str().unwrap().contains("users("));
    }
}
