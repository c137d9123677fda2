//! Water-filling strategies.
//!
//! Instead of buying unit by unit, these strategies search a single scalar
//! threshold and derive every category's allocation from it.
//!
//! 1. **Needs stage**: a water level over basic needs. Each category gets
//!    spend proportional to the utility of its basic bundle until that
//!    bundle is paid for; saturated categories become fixed costs and the
//!    level is re-solved over the rest.
//! 2. **Surplus stage** (only once every need is funded): the threshold λ
//!    on marginal utility per dollar is searched so that the implied
//!    excess demand exactly uses the remaining budget.
//!
//! The three strategies differ in how they run the surplus stage:
//!
//! | Strategy | λ search | Per-category demand |
//! |---|---|---|
//! | [`OptimisedMarginal`] | bisection | bisection |
//! | [`DirectSolve`] | bisection | Lambert W closed form |
//! | [`GradientDescent`] | dual gradient | bracketed Newton |
//!
//! Every loop is capped; a search that runs out of iterations keeps the
//! best feasible point and says so in the result message.
//!
//! # References
//!
//! - Boyd & Vandenberghe (2004), *Convex Optimization*, §5.5.3 (water-filling)
//! - Corless et al. (1996), "On the Lambert W Function"

mod config;
mod demand;
mod direct;
mod gradient;
mod lambert;
mod needs;
mod optimised;
mod solver;

pub use config::{GradientConfig, WaterFillingConfig};
pub use direct::DirectSolve;
pub use gradient::GradientDescent;
pub use lambert::lambert_w0;
pub use optimised::OptimisedMarginal;
