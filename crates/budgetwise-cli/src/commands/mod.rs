pub mod bills;
pub mod payoff;
pub mod projection;
