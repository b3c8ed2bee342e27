//! Panel bring-up
//!
//! The board-specific driver implements [`PanelDriver`]; [`bring_up`] runs the
//! init sequence and the rotation and turns any failure into the one fatal
//! error of the application, [`AppError::HardwareInit`].

use core::fmt::Debug;

use log::{error, info};

use crate::app_state::{AppError, debug_message};

/// Panel orientation, clockwise from the controller's native scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    /// Portrait with the USB port at the bottom right
    #[default]
    Deg270,
}

impl Rotation {
    /// Quarter turns clockwise.
    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }
}

/// The parts of a display driver bootstrap needs.
pub trait PanelDriver {
    type Error: Debug;

    /// Reset the controller and run its power-on command sequence.
    fn init(&mut self) -> Result<(), Self::Error>;

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), Self::Error>;
}

/// Initialise `panel` and rotate it.
pub fn bring_up<P: PanelDriver>(panel: &mut P, rotation: Rotation) -> Result<(), AppError> {
    panel.init().map_err(|e| {
        error!("Panel init failed: {:?}", e);
        AppError::HardwareInit(debug_message(&e))
    })?;

    panel.set_rotation(rotation).map_err(|e| {
        error!("Panel rotation failed: {:?}", e);
        AppError::HardwareInit(debug_message(&e))
    })?;

    info!("Panel ready, rotation {:?}", rotation);
    Ok(())
}
