use ledger_core::error::Result;
use ledger_core::model::{
    Allocation, FundPlan, FundPlanId, InvestmentRequest, Investor, InvestorId, Transaction,
    WalletAccount,
};
use uuid::Uuid;

pub mod memory;
pub mod snapshot;

/// Interface to the record collaborators the ledger core reads and writes:
/// investors, fund plans, wallets, investment requests, allocations and the
/// append-only transaction history.
///
/// Plain lookups and inserts are all the core needs, plus the single
/// compound write the atomicity rule requires: `record_payout`.
pub trait LedgerStore {
    fn investor(&self, id: &InvestorId) -> Option<&Investor>;
    fn investor_mut(&mut self, id: &InvestorId) -> Option<&mut Investor>;
    fn insert_investor(&mut self, investor: Investor);
    fn investors(&self) -> Vec<&Investor>;

    fn fund_plan(&self, id: &FundPlanId) -> Option<&FundPlan>;
    fn fund_plan_mut(&mut self, id: &FundPlanId) -> Option<&mut FundPlan>;
    fn insert_fund_plan(&mut self, plan: FundPlan);
    fn fund_plans(&self) -> Vec<&FundPlan>;

    fn wallet(&self, owner: &InvestorId) -> Option<&WalletAccount>;
    fn wallet_mut(&mut self, owner: &InvestorId) -> Option<&mut WalletAccount>;
    fn insert_wallet(&mut self, owner: InvestorId, wallet: WalletAccount);

    fn request(&self, id: Uuid) -> Option<&InvestmentRequest>;
    fn request_mut(&mut self, id: Uuid) -> Option<&mut InvestmentRequest>;
    fn insert_request(&mut self, request: InvestmentRequest);
    fn pending_requests(&self) -> Vec<&InvestmentRequest>;

    fn allocation(&self, id: Uuid) -> Option<&Allocation>;
    fn allocation_mut(&mut self, id: Uuid) -> Option<&mut Allocation>;
    fn insert_allocation(&mut self, allocation: Allocation);
    fn allocations(&self) -> &[Allocation];

    fn transactions(&self) -> &[Transaction];
    fn insert_transaction(&mut self, tx: Transaction);

    /// Credits the owner's wallet and appends the payout transaction as one
    /// unit: both happen or neither does.
    ///
    /// A credit without its transaction record would overstate the profit
    /// still distributable (double-pay risk); a record without its credit
    /// would understate it invisibly to the investor. This is the one place
    /// the store must be transactional.
    fn record_payout(&mut self, owner: &InvestorId, amount: f64, tx: Transaction) -> Result<()>;
}
