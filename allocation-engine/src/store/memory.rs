use super::LedgerStore;
use ledger_core::error::{LedgerError, Result};
use ledger_core::model::{
    Allocation, FundPlan, FundPlanId, InvestmentRequest, Investor, InvestorId, Transaction,
    WalletAccount,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory record store, also the snapshot (de)serialization target.
///
/// Allocations and transactions live in insertion-ordered vectors so the
/// ledger history reads in the order it was written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    investors: HashMap<InvestorId, Investor>,
    fund_plans: HashMap<FundPlanId, FundPlan>,
    wallets: HashMap<InvestorId, WalletAccount>,
    requests: HashMap<Uuid, InvestmentRequest>,
    allocations: Vec<Allocation>,
    transactions: Vec<Transaction>,
}

impl LedgerStore for MemoryStore {
    fn investor(&self, id: &InvestorId) -> Option<&Investor> {
        self.investors.get(id)
    }

    fn investor_mut(&mut self, id: &InvestorId) -> Option<&mut Investor> {
        self.investors.get_mut(id)
    }

    fn insert_investor(&mut self, investor: Investor) {
        self.investors.insert(investor.id.clone(), investor);
    }

    fn investors(&self) -> Vec<&Investor> {
        self.investors.values().collect()
    }

    fn fund_plan(&self, id: &FundPlanId) -> Option<&FundPlan> {
        self.fund_plans.get(id)
    }

    fn fund_plan_mut(&mut self, id: &FundPlanId) -> Option<&mut FundPlan> {
        self.fund_plans.get_mut(id)
    }

    fn insert_fund_plan(&mut self, plan: FundPlan) {
        self.fund_plans.insert(plan.id.clone(), plan);
    }

    fn fund_plans(&self) -> Vec<&FundPlan> {
        self.fund_plans.values().collect()
    }

    fn wallet(&self, owner: &InvestorId) -> Option<&WalletAccount> {
        self.wallets.get(owner)
    }

    fn wallet_mut(&mut self, owner: &InvestorId) -> Option<&mut WalletAccount> {
        self.wallets.get_mut(owner)
    }

    fn insert_wallet(&mut self, owner: InvestorId, wallet: WalletAccount) {
        self.wallets.insert(owner, wallet);
    }

    fn request(&self, id: Uuid) -> Option<&InvestmentRequest> {
        self.requests.get(&id)
    }

    fn request_mut(&mut self, id: Uuid) -> Option<&mut InvestmentRequest> {
        self.requests.get_mut(&id)
    }

    fn insert_request(&mut self, request: InvestmentRequest) {
        self.requests.insert(request.id(), request);
    }

    fn pending_requests(&self) -> Vec<&InvestmentRequest> {
        self.requests.values().filter(|r| r.is_pending()).collect()
    }

    fn allocation(&self, id: Uuid) -> Option<&Allocation> {
        self.allocations.iter().find(|a| a.id() == id)
    }

    fn allocation_mut(&mut self, id: Uuid) -> Option<&mut Allocation> {
        self.allocations.iter_mut().find(|a| a.id() == id)
    }

    fn insert_allocation(&mut self, allocation: Allocation) {
        self.allocations.push(allocation);
    }

    fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    fn insert_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    fn record_payout(&mut self, owner: &InvestorId, amount: f64, tx: Transaction) -> Result<()> {
        // The wallet lookup happens before either write, so a missing
        // wallet leaves no partial effect.
        let wallet = self
            .wallets
            .get_mut(owner)
            .ok_or_else(|| LedgerError::not_found("wallet", owner))?;

        wallet.credit_available(amount);
        self.transactions.push(tx);
        Ok(())
    }
}
