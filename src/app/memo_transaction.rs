use crate::Result;
use anyhow::Context;
use base64::{
    Engine as _,
    engine::general_purpose::STANDARD,
};
use solana_sdk::{
    compute_budget::ComputeBudgetInstruction,
    hash::Hash,
    message::Message,
    pubkey::Pubkey,
    transaction::Transaction,
};

/// Memo stamped on transactions that exist only so the wallet has something
/// to sign when navigating between scenes.
pub const BLANK_MEMO: &str = "This is a blank transaction";

/// Priority fee on blank transactions, in micro-lamports per compute unit.
pub const BLANK_PRIORITY_FEE: u64 = 1_000;

/// An unsigned transaction that moves no funds: a compute-unit-price hint
/// plus a fixed memo, fee paid by `fee_payer`.
pub fn build_blank_transaction(fee_payer: &Pubkey, recent_blockhash: Hash) -> Transaction {
    let instructions = [
        ComputeBudgetInstruction::set_compute_unit_price(BLANK_PRIORITY_FEE),
        spl_memo::build_memo(BLANK_MEMO.as_bytes(), &[]),
    ];
    let mut message = Message::new(&instructions, Some(fee_payer));
    message.recent_blockhash = recent_blockhash;
    Transaction::new_unsigned(message)
}

/// Wire encoding for the Actions `transaction` field.
pub fn encode_transaction(transaction: &Transaction) -> Result<String> {
    let bytes = bincode::serialize(transaction).context("serializing transaction")?;
    Ok(STANDARD.encode(bytes))
}
