//! Depository-mode extraction: NSDL/CDSL accounts and their holdings.
//!
//! Two passes. The first scans the whole document text for account headers
//! and pre-creates one `DematAccount` per `(DP Id, Client Id)` pair, plus
//! the aggregate "Mutual Fund Folios" account keyed by the absent pair. The
//! second walks lines in order: nothing is processed until the first account
//! banner, holder lines accumulate into a pending owner list, a DP/Client-Id
//! line selects the current account, and row dispatch is issuer-specific.

use std::collections::HashMap;

use caslens_core::error::Result;
use caslens_core::types::{DematAccount, DematOwner, Equity, MutualFundHolding};

use crate::numbers::parse_inr;
use crate::parsers::PageContent;
use crate::patterns;

type AccountKey = (Option<String>, Option<String>);

/// Walk the document and emit the demat account list.
pub fn parse_depository(pages: &[PageContent]) -> Result<Vec<DematAccount>> {
    let lines: Vec<&str> = pages
        .iter()
        .flat_map(|p| p.lines.iter().map(|l| l.text.as_str()))
        .collect();
    let full_text = lines.join("\n");

    let mut accounts: Vec<DematAccount> = Vec::new();
    let mut index: HashMap<AccountKey, usize> = HashMap::new();

    for caps in patterns::DEMAT_HEADER.captures_iter(&full_text) {
        let dp_id = caps[3].trim().to_string();
        let client_id = caps[4].trim().to_string();
        let key = (Some(dp_id.clone()), Some(client_id.clone()));
        if index.contains_key(&key) {
            continue;
        }
        index.insert(key, accounts.len());
        accounts.push(DematAccount {
            name: caps[2].trim().to_string(),
            account_type: caps[1].trim().to_string(),
            dp_id: Some(dp_id),
            client_id: Some(client_id),
            folios: caps[5].parse().unwrap_or(0),
            balance: parse_inr(&caps[6]),
            owners: Vec::new(),
            equities: Vec::new(),
            mutual_funds: Vec::new(),
        });
    }
    if let Some(caps) = patterns::DEMAT_MF_HEADER.captures(&full_text) {
        index.insert((None, None), accounts.len());
        accounts.push(DematAccount {
            name: "Mutual Fund Folios".to_string(),
            account_type: "MF".to_string(),
            dp_id: None,
            client_id: None,
            folios: caps[1].parse().unwrap_or(0),
            balance: parse_inr(&caps[3]),
            owners: Vec::new(),
            equities: Vec::new(),
            mutual_funds: Vec::new(),
        });
    }

    let mut current: Option<usize> = None;
    let mut pending_owners: Vec<DematOwner> = Vec::new();
    let mut processing_holdings = false;

    for line in &lines {
        if patterns::DEMAT_AC_TYPE.is_match(line) {
            // Banners and body rows never interleave across accounts, so a
            // fresh banner always resets the selection.
            processing_holdings = true;
            current = None;
        }
        if !processing_holdings {
            continue;
        }

        let Some(account_idx) = current else {
            if patterns::DEMAT_MF_TYPE.is_match(line.trim()) {
                current = index.get(&(None, None)).copied();
            }
            if line.to_uppercase().contains("ACCOUNT HOLDER") {
                for caps in patterns::DEMAT_AC_HOLDER.captures_iter(line) {
                    pending_owners.push(DematOwner {
                        name: caps[1].trim().to_string(),
                        pan: caps[2].trim().to_string(),
                    });
                }
            }
            if let Some(caps) = patterns::DEMAT_DP_ID.captures(line) {
                let key = (
                    Some(caps[1].trim().to_string()),
                    Some(caps[2].trim().to_string()),
                );
                if let Some(&idx) = index.get(&key) {
                    current = Some(idx);
                    accounts[idx].owners = std::mem::take(&mut pending_owners);
                }
            }
            continue;
        };

        let account = &mut accounts[account_idx];
        if account.account_type.contains("NSDL") {
            if let Some(caps) = patterns::NSDL_EQ.captures(line) {
                account.equities.push(Equity {
                    isin: caps[1].to_string(),
                    name: caps[2].trim().to_string(),
                    num_shares: parse_inr(&caps[4]),
                    price: parse_inr(&caps[5]),
                    value: parse_inr(&caps[6]),
                });
            } else if let Some(caps) = patterns::NSDL_MF.captures(line) {
                account.mutual_funds.push(MutualFundHolding {
                    isin: caps[1].to_string(),
                    name: caps[2].trim().to_string(),
                    balance: parse_inr(&caps[3]),
                    nav: parse_inr(&caps[4]),
                    value: parse_inr(&caps[5]),
                });
            }
        } else if account.account_type.contains("CDSL") {
            if let Some(caps) = patterns::CDSL_HOLDINGS.captures(line) {
                let isin = caps[1].to_string();
                let name = caps[2].trim().to_string();
                let balance = parse_inr(&caps[3]);
                let nav = parse_inr(&caps[12]);
                let value = parse_inr(&caps[13]);
                if isin.starts_with("INF") {
                    account.mutual_funds.push(MutualFundHolding {
                        isin,
                        name,
                        balance,
                        nav,
                        value,
                    });
                } else if isin.starts_with("INE") {
                    account.equities.push(Equity {
                        isin,
                        name,
                        num_shares: balance,
                        price: nav,
                        value,
                    });
                }
            }
        } else if account.account_type == "MF" {
            if let Some(caps) = patterns::MF_FOLIO_ROW.captures(line) {
                let name = patterns::WHITESPACE_RUN.replace_all(caps[2].trim(), " ");
                let name = patterns::TRAILING_JUNK.replace_all(&name, "").to_string();
                account.mutual_funds.push(MutualFundHolding {
                    isin: caps[1].to_string(),
                    name,
                    balance: parse_inr(&caps[4]),
                    nav: parse_inr(&caps[7]),
                    value: parse_inr(&caps[8]),
                });
            }
        }
    }

    Ok(accounts)
}
