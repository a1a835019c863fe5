//! Renewable-first dispatch of forecast generation against forecast load.

use super::types::{Allocation, DispatchError, Forecast};

/// Relative tolerance used when asserting conservation on unrounded output.
const RELATIVE_TOLERANCE: f64 = 1e-9;

/// Allocates solar, wind and grid power to cover `load`.
///
/// All arguments are in kW. Solar is consumed before wind; any surplus is
/// exported and any deficit is imported. The result is unrounded.
///
/// # Errors
///
/// Returns [`DispatchError::InvalidArgument`] if any input is NaN, infinite
/// or negative.
///
/// # Examples
///
/// ```
/// use microgrid_dispatch::dispatch::allocate;
///
/// let a = allocate(10.0, 6.0, 2.0).unwrap();
/// assert_eq!(a.solar_used, 6.0);
/// assert_eq!(a.wind_used, 2.0);
/// assert_eq!(a.grid_import, 2.0);
/// assert_eq!(a.grid_export, 0.0);
/// ```
pub fn allocate(load: f64, solar: f64, wind: f64) -> Result<Allocation, DispatchError> {
    Ok(Forecast::new(load, solar, wind)?.allocate())
}

impl Forecast {
    /// Allocates this forecast. Infallible since the forecast is validated.
    pub fn allocate(&self) -> Allocation {
        let (load, solar, wind) = (self.load(), self.solar(), self.wind());
        let renewable_total = self.renewable_total();
        let net = renewable_total - load;

        let allocation = if net >= 0.0 {
            let solar_used = solar.min(load);
            let remaining_load = load - solar_used;
            Allocation {
                solar_used,
                wind_used: wind.min(remaining_load),
                grid_import: 0.0,
                grid_export: renewable_total - load,
            }
        } else {
            Allocation {
                solar_used: solar,
                wind_used: wind,
                grid_import: load - renewable_total,
                grid_export: 0.0,
            }
        };

        let allocation = Allocation {
            solar_used: allocation.solar_used.max(0.0),
            wind_used: allocation.wind_used.max(0.0),
            grid_import: allocation.grid_import.max(0.0),
            grid_export: allocation.grid_export.max(0.0),
        };

        debug_assert!(
            allocation.check(self, self.tolerance_kw()).is_ok(),
            "allocation {allocation:?} violates conservation for {self:?}"
        );
        allocation
    }

    /// Absolute tolerance scaled to the magnitude of this forecast.
    pub fn tolerance_kw(&self) -> f64 {
        RELATIVE_TOLERANCE * (1.0 + self.load() + self.renewable_total())
    }
}
