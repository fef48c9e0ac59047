//! Coarse classification of how a pool generates yield, derived from the
//! resolved prize-pool build. Pure; strategy-side kinds never classify.

use crate::registry::ContractKind;
use crate::resolver::ContractVersions;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrizePoolType {
    Compound,
    Stake,
    YieldSource,
}

impl fmt::Display for PrizePoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PrizePoolType::Compound => "compound-backed",
            PrizePoolType::Stake => "stake-backed",
            PrizePoolType::YieldSource => "yield-backed",
        };
        f.write_str(label)
    }
}

pub fn prize_pool_type(versions: Option<&ContractVersions>) -> Option<PrizePoolType> {
    match versions?.prize_pool.contract {
        ContractKind::CompoundPrizePool => Some(PrizePoolType::Compound),
        ContractKind::StakePrizePool => Some(PrizePoolType::Stake),
        ContractKind::YieldSourcePrizePool => Some(PrizePoolType::YieldSource),
        ContractKind::SingleRandomWinner | ContractKind::MultipleWinners => None,
    }
}
