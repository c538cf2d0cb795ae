//! Audio-graph description of the voice DSP.
//!
//! The host framework owns the graph; these tables only describe the nodes
//! and edges the DSP contributes. The supply widget's power hooks are
//! delivered back to the driver as [`DspEvent`]s.

use crate::power::DspEvent;

/// "Voice DSP" supply widget name.
pub const VOICE_DSP: &str = "Voice DSP";
/// Downstream (playback side) passthrough widget name.
pub const DSP_DOWNSTREAM: &str = "DSP Downstream";
/// Upstream (capture side) passthrough widget name.
pub const DSP_UPSTREAM: &str = "DSP Upstream";

/// Widget behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    /// Power supply with a sequencing slot and power hooks.
    Supply {
        /// Sequencing slot among supplies
        subseq: u8,
        /// Events raised to the driver
        events: &'static [DspEvent],
    },
    /// Gain-less passthrough, no register.
    Pga,
}

/// One node of the audio graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Widget {
    /// Node name
    pub name: &'static str,
    /// Behaviour
    pub kind: WidgetKind,
}

impl Widget {
    /// `true` if this widget raises `event`.
    pub fn raises(&self, event: DspEvent) -> bool {
        match self.kind {
            WidgetKind::Supply { events, .. } => events.contains(&event),
            WidgetKind::Pga => false,
        }
    }
}

/// One edge of the audio graph, `source → sink`, optionally gated by a mux
/// item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Destination node
    pub sink: &'static str,
    /// Mux item or switch name gating the edge
    pub control: Option<&'static str>,
    /// Origin node
    pub source: &'static str,
}

/// Widgets, in registration order.
pub static WIDGETS: [Widget; 3] = [
    Widget {
        name: VOICE_DSP,
        kind: WidgetKind::Supply {
            subseq: 1,
            events: &[DspEvent::PostPowerDown, DspEvent::PostPowerUp],
        },
    },
    Widget {
        name: DSP_DOWNSTREAM,
        kind: WidgetKind::Pga,
    },
    Widget {
        name: DSP_UPSTREAM,
        kind: WidgetKind::Pga,
    },
];

/// Routes, in registration order.
pub static ROUTES: [Route; 6] = [
    Route {
        sink: DSP_DOWNSTREAM,
        control: None,
        source: VOICE_DSP,
    },
    Route {
        sink: DSP_DOWNSTREAM,
        control: None,
        source: "RxDP Mux",
    },
    Route {
        sink: DSP_UPSTREAM,
        control: None,
        source: VOICE_DSP,
    },
    Route {
        sink: DSP_UPSTREAM,
        control: None,
        source: "TDM Data Mux",
    },
    Route {
        sink: "DSP DL Mux",
        control: Some("DSP"),
        source: DSP_DOWNSTREAM,
    },
    Route {
        sink: "DSP UL Mux",
        control: Some("DSP"),
        source: DSP_UPSTREAM,
    },
];

/// Look a widget up by name.
pub fn widget(name: &str) -> Option<&'static Widget> {
    WIDGETS.iter().find(|w| w.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supply_raises_both_events() {
        let supply = widget(VOICE_DSP);
        assert!(supply.is_some_and(|w| w.raises(DspEvent::PostPowerUp)));
        assert!(supply.is_some_and(|w| w.raises(DspEvent::PostPowerDown)));
        let upstream = widget(DSP_UPSTREAM);
        assert!(upstream.is_some_and(|w| !w.raises(DspEvent::PostPowerUp)));
    }

    #[test]
    fn passthroughs_are_fed_by_the_supply() {
        for name in [DSP_DOWNSTREAM, DSP_UPSTREAM] {
            let fed = ROUTES
                .iter()
                .any(|r| r.sink == name && r.source == VOICE_DSP);
            assert!(fed, "{name}");
        }
    }

    #[test]
    fn mux_edges_use_the_dsp_item() {
        let gated: Vec<_> = ROUTES.iter().filter(|r| r.control.is_some()).collect();
        assert_eq!(gated.len(), 2);
        assert!(gated.iter().all(|r| r.control == Some("DSP")));
        let edge = |sink: &str, source: &str| {
            gated.iter().any(|r| r.sink == sink && r.source == source)
        };
        assert!(edge("DSP DL Mux", DSP_DOWNSTREAM));
        assert!(edge("DSP UL Mux", DSP_UPSTREAM));
    }

    #[test]
    fn every_local_route_end_is_a_widget() {
        for route in &ROUTES {
            let local = [route.sink, route.source]
                .into_iter()
                .filter(|n| n.starts_with("DSP ") && !n.ends_with(" Mux"));
            for name in local {
                assert!(widget(name).is_some(), "{name}");
            }
        }
    }
}
