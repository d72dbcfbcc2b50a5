//! `gitreg fund`, `gitreg balance` and `gitreg tick`.

use anyhow::Result;
use clap::Args;

use gitreg_core::{Address, Amount, Tick};

use crate::session::Session;

#[derive(Args, Debug)]
pub struct FundArgs {
    pub account: String,
    pub amount: Amount,
}

impl FundArgs {
    pub fn run(self) -> Result<()> {
        let mut session = Session::open()?;
        let account = Address::from(self.account);
        session.host.deposit(&account, self.amount);
        println!("{}", session.host.balance_of(&account));
        session.commit()
    }
}

#[derive(Args, Debug)]
pub struct BalanceArgs {
    pub account: String,
}

impl BalanceArgs {
    pub fn run(self) -> Result<()> {
        let session = Session::open()?;
        println!("{}", session.host.balance_of(&Address::from(self.account)));
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct TickArgs {
    /// Ticks to move the host clock forward by.
    #[arg(long, default_value_t = 0)]
    pub advance: Tick,
}

impl TickArgs {
    pub fn run(self) -> Result<()> {
        let session = Session::open()?;
        let tick = session.clock.advance(self.advance);
        println!("{tick}");
        if self.advance > 0 {
            session.commit()?;
        }
        Ok(())
    }
}
