mod ledger;
mod progress;
