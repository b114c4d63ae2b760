//! Shared fixtures for occupancy integration tests.

use occupancy::{EngineConfig, ExposureSample, IovKey, IovRecordTable, ModuleDefect, QualityEngine};
use topology::{
    BarrelLocation, DefectMask, ForwardLocation, ModuleId, ModuleLocation, TopologyTable,
};

/// Module ids used by the fixture topology.
pub const BARREL_MODULE: ModuleId = ModuleId(302056728);
pub const FORWARD_MODULE: ModuleId = ModuleId(344201476);

/// A small topology with one barrel and one forward module.
pub fn fixture_topology() -> TopologyTable {
    let mut table = TopologyTable::new();
    table.insert(
        BARREL_MODULE,
        ModuleLocation::Barrel(BarrelLocation {
            layer: 1,
            ladder: 1,
            module: 1,
            outer_ladder: false,
        }),
    );
    table.insert(
        FORWARD_MODULE,
        ModuleLocation::Forward(ForwardLocation {
            ring: 1,
            blade: 3,
            panel: 2,
            disk: 2,
        }),
    );
    table
}

/// Build a record table from (since-key, defect list) pairs.
pub fn records_from(entries: Vec<(IovKey, Vec<(ModuleId, u16)>)>) -> IovRecordTable {
    let mut table = IovRecordTable::new();
    for (since, defects) in entries {
        let defects = defects
            .into_iter()
            .map(|(module, mask)| ModuleDefect {
                module,
                mask: DefectMask(mask),
            })
            .collect();
        table.push(since, defects);
    }
    table
}

/// Engine over the fixture topology with default configuration.
pub fn fixture_engine(records: IovRecordTable) -> QualityEngine<IovRecordTable, TopologyTable> {
    QualityEngine::new(EngineConfig::default(), records, fixture_topology())
}

/// Shorthand exposure sample.
pub fn sample(run: u32, block: u32, exposure: f64) -> ExposureSample {
    ExposureSample {
        run,
        block,
        exposure,
    }
}
