//! Layer visibility flags and their resolution into per-prop visibility.

use crate::buffers::RayPiece;

/// One checkbox per scene layer, plus the uncertainty toggle which swaps
/// event glyphs for uncertainty glyphs instead of adding a layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LayerVisibility {
    pub mine: bool,
    pub seismic_events: bool,
    pub blasts: bool,
    pub historic_events: bool,
    pub ray: bool,
    pub uncertainty: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        LayerVisibility {
            mine: true,
            seismic_events: true,
            blasts: true,
            historic_events: true,
            ray: false,
            uncertainty: false,
        }
    }
}

/// The three event layers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventLayer {
    SeismicEvents,
    Blasts,
    HistoricEvents,
}

impl LayerVisibility {
    pub fn layer_enabled(&self, layer: EventLayer) -> bool {
        match layer {
            EventLayer::SeismicEvents => self.seismic_events,
            EventLayer::Blasts => self.blasts,
            EventLayer::HistoricEvents => self.historic_events,
        }
    }

    /// Event glyphs show when the layer is on and uncertainty mode is off.
    pub fn event_prop_visible(&self, layer: EventLayer) -> bool {
        self.layer_enabled(layer) && !self.uncertainty
    }

    /// Uncertainty glyphs replace event glyphs while the toggle is on.
    /// Historic events carry no uncertainty glyphs.
    pub fn uncertainty_prop_visible(&self, layer: EventLayer) -> bool {
        match layer {
            EventLayer::HistoricEvents => false,
            _ => self.layer_enabled(layer) && self.uncertainty,
        }
    }
}

/// How rays are filtered against the preferred origin.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RayFilterMode {
    /// Preferred origin, arrival rays only.
    #[default]
    PreferredOriginArrival,
    /// All rays of the preferred origin.
    PreferredOrigin,
    /// Every ray.
    All,
}

impl RayFilterMode {
    pub fn from_index(i: u32) -> Self {
        match i {
            0 => RayFilterMode::PreferredOriginArrival,
            1 => RayFilterMode::PreferredOrigin,
            _ => RayFilterMode::All,
        }
    }

    /// Piece sets enabled in this mode.
    pub fn active_pieces(&self) -> &'static [RayPiece] {
        match self {
            RayFilterMode::PreferredOriginArrival => {
                &[RayPiece::SOriginArrival, RayPiece::POriginArrival]
            }
            RayFilterMode::PreferredOrigin => &[
                RayPiece::SOriginArrival,
                RayPiece::POriginArrival,
                RayPiece::SOrigin,
                RayPiece::POrigin,
            ],
            RayFilterMode::All => &RayPiece::ALL,
        }
    }

    /// A ray piece shows only when the ray layer is on and the piece is in
    /// the active set.
    pub fn piece_visible(&self, visibility: &LayerVisibility, piece: RayPiece) -> bool {
        visibility.ray && self.active_pieces().contains(&piece)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncertainty_swaps_event_props() {
        let mut v = LayerVisibility::default();
        assert!(v.event_prop_visible(EventLayer::SeismicEvents));
        assert!(!v.uncertainty_prop_visible(EventLayer::SeismicEvents));

        v.uncertainty = true;
        assert!(!v.event_prop_visible(EventLayer::SeismicEvents));
        assert!(v.uncertainty_prop_visible(EventLayer::SeismicEvents));
        // Historic layer never grows uncertainty glyphs.
        assert!(!v.uncertainty_prop_visible(EventLayer::HistoricEvents));

        v.seismic_events = false;
        assert!(!v.uncertainty_prop_visible(EventLayer::SeismicEvents));
    }

    #[test]
    fn ray_modes_widen_the_piece_set() {
        assert_eq!(
            RayFilterMode::from_index(0).active_pieces().len(),
            2
        );
        assert_eq!(RayFilterMode::from_index(1).active_pieces().len(), 4);
        assert_eq!(RayFilterMode::from_index(7).active_pieces().len(), 6);

        let mut v = LayerVisibility::default();
        let mode = RayFilterMode::PreferredOriginArrival;
        assert!(!mode.piece_visible(&v, RayPiece::SOriginArrival));
        v.ray = true;
        assert!(mode.piece_visible(&v, RayPiece::SOriginArrival));
        assert!(!mode.piece_visible(&v, RayPiece::SAll));
    }
}
