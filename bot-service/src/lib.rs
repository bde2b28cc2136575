mod browser;
mod controller;
mod operator;


pub use browser::{BrowserLauncher, SystemBrowser};
pub use controller::{BotController, LifecycleState};
pub use operator::{AutoConfirm, ConsoleOperator, Operator};
