//! Typed vertex buffers handed to the renderer.
//!
//! Buffers are rebuilt wholesale from filtered records on every refresh.
//! The derived arrays (adjusted magnitudes/uncertainties) can be recomputed
//! in place from the raw arrays without re-fetching anything.

use catalog::records::{Event, Ray, ScatterSample, SignalQuality, Station};
use foundation::{uncertainty_scale, MineBounds, ScaleMap, TIME_RATIO, UNCERTAINTY_CAP};

use crate::event_index::{EventIndex, IndexError, RefreshHandle};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBuffers {
    pub positions: Vec<[f32; 3]>,
    pub local_ids: Vec<u32>,
    pub magnitudes: Vec<f32>,
    pub adjusted_magnitudes: Vec<f32>,
    /// Epoch nanoseconds divided by `TIME_RATIO`.
    pub times: Vec<f64>,
    /// Raw uncertainty, already capped at `UNCERTAINTY_CAP`.
    pub uncertainties: Vec<f32>,
    pub adjusted_uncertainties: Vec<f32>,
    pub uncertainty_directions: Vec<[f32; 3]>,
}

impl EventBuffers {
    /// Builds buffers from already-filtered events, assigning local ids
    /// through the shared index as it goes.
    pub fn build(
        events: &[&Event],
        translate: [f64; 3],
        index: &mut EventIndex,
        handle: RefreshHandle,
    ) -> Result<Self, IndexError> {
        let mut out = EventBuffers::default();
        for event in events {
            let local_id = index.assign(handle, event.event_resource_id.clone())?;
            out.local_ids.push(local_id);
            out.positions.push([
                (event.x + translate[0]) as f32,
                (event.y + translate[1]) as f32,
                (event.z + translate[2]) as f32,
            ]);
            out.magnitudes.push(event.magnitude as f32);
            out.times.push(event.time_epoch as f64 / TIME_RATIO);
            let uncertainty = event.uncertainty.unwrap_or(0.0).min(UNCERTAINTY_CAP);
            out.uncertainties.push(uncertainty as f32);
            let dir = event.uncertainty_direction();
            out.uncertainty_directions
                .push([dir[0] as f32, dir[1] as f32, dir[2] as f32]);
        }
        out.adjusted_magnitudes = vec![0.0; out.magnitudes.len()];
        out.adjusted_uncertainties = vec![0.0; out.uncertainties.len()];
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vertex connectivity in the `[count, 0, 1, ..]` layout point mappers
    /// expect.
    pub fn verts(&self) -> Vec<u32> {
        let n = self.len() as u32;
        let mut verts = Vec::with_capacity(self.len() + 1);
        verts.push(n);
        verts.extend(0..n);
        verts
    }

    pub fn rescale_magnitudes(&mut self, scale: &ScaleMap) {
        self.adjusted_magnitudes = self
            .magnitudes
            .iter()
            .map(|&m| scale.map(m as f64) as f32)
            .collect();
    }

    pub fn rescale_uncertainties(&mut self, factor: f64) {
        self.adjusted_uncertainties = self
            .uncertainties
            .iter()
            .map(|&u| uncertainty_scale(u as f64, factor) as f32)
            .collect();
    }
}

/// 3-axis crosshair through an activated event, spanning the mine bounds.
/// Segments: (0,1) along x, (2,3) along y, (4,5) along z.
pub fn active_marker_points(
    bounds: &MineBounds,
    translate: [f64; 3],
    position: [f32; 3],
) -> [[f32; 3]; 6] {
    let [x, y, z] = position;
    [
        [(bounds.min[0] + translate[0]) as f32, y, z],
        [(bounds.max[0] + translate[0]) as f32, y, z],
        [x, (bounds.min[1] + translate[1]) as f32, z],
        [x, (bounds.max[1] + translate[1]) as f32, z],
        [x, y, (bounds.min[2] + translate[2]) as f32],
        [x, y, (bounds.max[2] + translate[2]) as f32],
    ]
}

/// Location-uncertainty scatter cloud for one event. Samples outside the
/// mine bounds are dropped, like any other rendered position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScatterBuffers {
    pub positions: Vec<[f32; 3]>,
}

impl ScatterBuffers {
    pub fn build(samples: &[ScatterSample], bounds: &MineBounds, translate: [f64; 3]) -> Self {
        let positions = samples
            .iter()
            .filter(|s| bounds.contains(s.x, s.y, s.z))
            .map(|s| {
                [
                    (s.x + translate[0]) as f32,
                    (s.y + translate[1]) as f32,
                    (s.z + translate[2]) as f32,
                ]
            })
            .collect();
        ScatterBuffers { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Neutral signal status before any quality sample arrives.
pub const STATION_STATUS_NEUTRAL: f32 = 0.5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationBuffers {
    pub codes: Vec<String>,
    pub positions: Vec<[f32; 3]>,
    /// Sensor orientations, negated so glyphs point into the rock.
    pub orientations: Vec<[f32; 3]>,
    pub statuses: Vec<f32>,
}

impl StationBuffers {
    pub fn build(stations: &[Station], translate: [f64; 3]) -> Self {
        let mut out = StationBuffers::default();
        for station in stations {
            out.codes.push(station.code.clone());
            out.positions.push([
                (station.location_x + translate[0]) as f32,
                (station.location_y + translate[1]) as f32,
                (station.location_z + translate[2]) as f32,
            ]);
            let [ox, oy, oz] = station.orientation();
            out.orientations.push([-ox as f32, -oy as f32, -oz as f32]);
            out.statuses.push(STATION_STATUS_NEUTRAL);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Updates statuses in place from live quality samples. Integrity 0.5
    /// maps to 0; the rendered range is [-1, 1].
    pub fn apply_signal_quality(&mut self, samples: &[SignalQuality]) {
        for sample in samples {
            if let Some(i) = self.codes.iter().position(|c| c == &sample.station_code) {
                self.statuses[i] = (2.0 * (sample.integrity - 0.5)) as f32;
            }
        }
    }
}

/// The six ray piece sets: phase (P/S) crossed with how specific the origin
/// match is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RayPiece {
    SAll,
    PAll,
    SOrigin,
    POrigin,
    SOriginArrival,
    POriginArrival,
}

impl RayPiece {
    pub const ALL: [RayPiece; 6] = [
        RayPiece::SAll,
        RayPiece::PAll,
        RayPiece::SOrigin,
        RayPiece::POrigin,
        RayPiece::SOriginArrival,
        RayPiece::POriginArrival,
    ];
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RayBuffers {
    pub s_all: Vec<Vec<[f32; 3]>>,
    pub p_all: Vec<Vec<[f32; 3]>>,
    pub s_origin: Vec<Vec<[f32; 3]>>,
    pub p_origin: Vec<Vec<[f32; 3]>>,
    pub s_origin_arrival: Vec<Vec<[f32; 3]>>,
    pub p_origin_arrival: Vec<Vec<[f32; 3]>>,
}

impl RayBuffers {
    /// Classifies rays against the event's preferred origin. Rays from the
    /// preferred origin split on the arrival flag; everything else lands in
    /// the per-phase "all" piece. Unknown phases are dropped.
    pub fn build(rays: &[Ray], preferred_origin: &str, translate: [f64; 3]) -> Self {
        let mut out = RayBuffers::default();
        for ray in rays {
            let polyline: Vec<[f32; 3]> = ray
                .nodes
                .iter()
                .map(|n| {
                    [
                        (n[0] + translate[0]) as f32,
                        (n[1] + translate[1]) as f32,
                        (n[2] + translate[2]) as f32,
                    ]
                })
                .collect();

            let preferred = ray.origin == preferred_origin;
            let target = match (ray.phase.as_str(), preferred, ray.arrival) {
                ("S", true, true) => &mut out.s_origin_arrival,
                ("S", true, false) => &mut out.s_origin,
                ("S", false, _) => &mut out.s_all,
                ("P", true, true) => &mut out.p_origin_arrival,
                ("P", true, false) => &mut out.p_origin,
                ("P", false, _) => &mut out.p_all,
                _ => continue,
            };
            target.push(polyline);
        }
        out
    }

    pub fn piece(&self, piece: RayPiece) -> &[Vec<[f32; 3]>] {
        match piece {
            RayPiece::SAll => &self.s_all,
            RayPiece::PAll => &self.p_all,
            RayPiece::SOrigin => &self.s_origin,
            RayPiece::POrigin => &self.p_origin,
            RayPiece::SOriginArrival => &self.s_origin_arrival,
            RayPiece::POriginArrival => &self.p_origin_arrival,
        }
    }

    pub fn ray_count(&self) -> usize {
        RayPiece::ALL.iter().map(|&p| self.piece(p).len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_index::EventIndex;
    use pretty_assertions::assert_eq;

    fn event(id: &str, x: f64, magnitude: f64, uncertainty: Option<f64>) -> Event {
        Event {
            event_resource_id: id.to_string(),
            x,
            y: 0.0,
            z: 0.0,
            magnitude,
            time_epoch: 20_000_000_000,
            uncertainty,
            uncertainty_vector_x: None,
            uncertainty_vector_y: None,
            uncertainty_vector_z: None,
            event_type: "earthquake".to_string(),
            preferred_origin_id: String::new(),
        }
    }

    #[test]
    fn build_translates_and_caps() {
        let bounds = MineBounds::new([-100.0, -100.0, -50.0], [100.0, 100.0, 50.0]).unwrap();
        let translate = bounds.translate();
        let events = vec![event("a", 50.0, 1.0, Some(400.0))];
        let refs: Vec<&Event> = events.iter().collect();

        let mut index = EventIndex::new();
        let h = index.begin_refresh();
        let buffers = EventBuffers::build(&refs, translate, &mut index, h).unwrap();

        assert_eq!(buffers.positions, vec![[50.0, 0.0, -50.0]]);
        assert_eq!(buffers.local_ids, vec![0]);
        assert_eq!(buffers.uncertainties, vec![UNCERTAINTY_CAP as f32]);
        assert_eq!(buffers.times, vec![2.0]);
        assert_eq!(buffers.uncertainty_directions, vec![[0.0, 0.0, 1.0]]);
        assert_eq!(buffers.verts(), vec![1, 0]);
    }

    #[test]
    fn rescale_recomputes_adjusted_arrays_in_place() {
        let events = vec![
            event("a", 0.0, -2.0, Some(10.0)),
            event("b", 0.0, 3.0, None),
            event("c", 0.0, 10.0, Some(1.0)),
        ];
        let refs: Vec<&Event> = events.iter().collect();
        let mut index = EventIndex::new();
        let h = index.begin_refresh();
        let mut buffers = EventBuffers::build(&refs, [0.0; 3], &mut index, h).unwrap();

        let scale = ScaleMap::new([-2.0, 3.0], [0.1, 1.0], 50.0).unwrap();
        buffers.rescale_magnitudes(&scale);
        assert_eq!(buffers.adjusted_magnitudes, vec![5.0, 50.0, 50.0]);

        buffers.rescale_uncertainties(2.0);
        assert_eq!(buffers.adjusted_uncertainties, vec![20.0, 0.0, 2.0]);
    }

    #[test]
    fn crosshair_spans_bounds_through_point() {
        let bounds = MineBounds::new([-100.0, -100.0, -50.0], [100.0, 100.0, 50.0]).unwrap();
        let points = active_marker_points(&bounds, bounds.translate(), [10.0, 20.0, 5.0]);
        assert_eq!(points[0], [-100.0, 20.0, 5.0]);
        assert_eq!(points[1], [100.0, 20.0, 5.0]);
        assert_eq!(points[2], [10.0, -100.0, 5.0]);
        assert_eq!(points[3], [10.0, 100.0, 5.0]);
        assert_eq!(points[4], [10.0, 20.0, -100.0]);
        assert_eq!(points[5], [10.0, 20.0, 0.0]);
    }

    #[test]
    fn scatter_filters_to_bounds() {
        let bounds = MineBounds::new([-100.0, -100.0, -50.0], [100.0, 100.0, 50.0]).unwrap();
        let samples = vec![
            ScatterSample { x: 10.0, y: 0.0, z: 0.0 },
            ScatterSample { x: 500.0, y: 0.0, z: 0.0 },
            ScatterSample { x: -100.0, y: 100.0, z: 50.0 },
        ];
        let buffers = ScatterBuffers::build(&samples, &bounds, bounds.translate());
        assert_eq!(
            buffers.positions,
            vec![[10.0, 0.0, -50.0], [-100.0, 100.0, 0.0]]
        );
        assert_eq!(buffers.len(), 2);
    }

    #[test]
    fn station_status_updates_by_code() {
        let stations = vec![Station {
            code: "ST01".into(),
            name: String::new(),
            location_x: 1.0,
            location_y: 2.0,
            location_z: 3.0,
            components: vec![],
        }];
        let mut buffers = StationBuffers::build(&stations, [0.0; 3]);
        assert_eq!(buffers.statuses, vec![STATION_STATUS_NEUTRAL]);
        assert_eq!(buffers.orientations, vec![[0.0, 0.0, -1.0]]);

        buffers.apply_signal_quality(&[
            SignalQuality {
                station_code: "ST01".into(),
                integrity: 1.0,
            },
            SignalQuality {
                station_code: "UNKNOWN".into(),
                integrity: 0.0,
            },
        ]);
        assert_eq!(buffers.statuses, vec![1.0]);
    }

    #[test]
    fn rays_classify_into_pieces() {
        let mk = |phase: &str, arrival: bool, origin: &str| Ray {
            phase: phase.to_string(),
            arrival,
            origin: origin.to_string(),
            nodes: vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]],
        };
        let rays = vec![
            mk("S", true, "origin-1"),
            mk("S", false, "origin-1"),
            mk("P", true, "origin-2"),
            mk("P", true, "origin-1"),
            mk("X", true, "origin-1"),
        ];
        let buffers = RayBuffers::build(&rays, "origin-1", [1.0, 0.0, 0.0]);
        assert_eq!(buffers.s_origin_arrival.len(), 1);
        assert_eq!(buffers.s_origin.len(), 1);
        assert_eq!(buffers.p_all.len(), 1);
        assert_eq!(buffers.p_origin_arrival.len(), 1);
        assert_eq!(buffers.ray_count(), 4);
        assert_eq!(buffers.s_origin_arrival[0][1], [2.0, 1.0, 1.0]);
    }
}
