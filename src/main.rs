//! Demo scenario: anchors placed around a creator, an observer drifting
//! past the boundary and back, every update logged as the transport layer
//! would see it.

use geoanchor::{
    Anchor, EngineConfig, EnuVector, FrameConverter, GeodeticPosition, MemoryAnchorStore,
    PassthroughRefinement, RawFix, SessionApi,
};
use tracing::info;

const CREATOR_LAT: f64 = 49.2781;
const CREATOR_LON: f64 = -122.9199;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = EngineConfig::default();
    let converter = FrameConverter::from_config(&config);
    let creator = GeodeticPosition::new(CREATOR_LAT, CREATOR_LON, config.default_height_m)?;

    let mut store = MemoryAnchorStore::new();
    for (id, vector) in [
        ("bench-plaque", EnuVector::new(5.0, 10.0, 0.0)),
        ("fountain-note", EnuVector::new(-20.0, 35.0, 1.5)),
        ("mural-tag", EnuVector::new(60.0, -15.0, 2.0)),
    ] {
        store.insert(Anchor::place(id, creator.clone(), vector, &converter)?);
    }
    info!(anchors = store.len(), "anchor store seeded");

    let api = SessionApi::new(config, Box::new(PassthroughRefinement), Box::new(store))?;
    let mut session = api.open_session("demo-observer");

    // A short walk: settle at the creator's spot, drift north past the
    // 50 m boundary, then come back.
    let walk: [(f64, &str); 5] = [
        (0.0, "initial fix"),
        (20.0, "small drift"),
        (45.0, "approaching the boundary"),
        (120.0, "well past the boundary"),
        (15.0, "back near the start"),
    ];

    for (north_m, label) in walk {
        let offset_deg = (north_m / geoanchor::core::MEAN_EARTH_RADIUS_M).to_degrees();
        let fix = RawFix::new(CREATOR_LAT + offset_deg, CREATOR_LON);
        let update = api.handle_sample(&mut session, fix)?;

        info!(
            step = label,
            event = ?update.event,
            state = ?update.state,
            "sample processed"
        );
        if let Some(assets) = update.resolved_assets {
            for asset in assets {
                let v = asset.observer_to_object.vector;
                info!(
                    anchor = %asset.anchor_id,
                    east_m = v.east_m,
                    north_m = v.north_m,
                    up_m = v.up_m,
                    "anchor resolved into observer frame"
                );
            }
        }
    }

    Ok(())
}
