use treasure_map_core::{
    Adventurer, BlockReason, CellCoord, Direction, Instruction, MapDimensions, Mountain,
    Scenario, Treasure,
};
use treasure_map_system_analytics::Analytics;
use treasure_map_system_movement::simulate_with;

fn adventurer(name: &str, column: u32, row: u32, facing: Direction, moves: &str) -> Adventurer {
    let instructions = moves
        .chars()
        .map(|letter| Instruction::from_letter(letter).expect("valid instruction letter"))
        .collect();
    Adventurer::new(name, CellCoord::new(column, row), facing, instructions)
}

#[test]
fn report_matches_the_run() {
    let mut scenario = Scenario::new(MapDimensions::new(3, 3));
    scenario.mountains.push(Mountain::new(CellCoord::new(1, 1)));
    scenario
        .treasures
        .push(Treasure::new(CellCoord::new(2, 2), 1));
    scenario
        .adventurers
        .push(adventurer("Jon", 0, 0, Direction::East, "AADAAAGA"));

    let mut analytics = Analytics::new();
    let result = simulate_with(scenario, |events| analytics.handle(events));
    let report = analytics.report();

    assert_eq!(report.ticks, 8);
    assert_eq!(report.advances, 4);
    assert_eq!(report.turns, 2);
    assert_eq!(report.blocked.get(BlockReason::OutOfBounds), 2);
    assert_eq!(report.blocked.total(), 2);
    assert_eq!(
        u64::from(report.treasures_collected),
        result.collected_treasures()
    );
}

#[test]
fn contested_and_occupied_blocks_are_told_apart() {
    let mut scenario = Scenario::new(MapDimensions::new(3, 2));
    scenario
        .adventurers
        .push(adventurer("Jon", 0, 0, Direction::East, "A"));
    scenario
        .adventurers
        .push(adventurer("Jane", 2, 0, Direction::West, "A"));
    scenario
        .adventurers
        .push(adventurer("Indy", 0, 1, Direction::North, "A"));

    let mut analytics = Analytics::new();
    let _ = simulate_with(scenario, |events| analytics.handle(events));
    let report = analytics.report();

    assert_eq!(report.blocked.get(BlockReason::Contested), 2);
    assert_eq!(report.blocked.get(BlockReason::Occupied), 1);
    assert_eq!(report.advances, 0);

    let rendered = report.to_string();
    assert!(rendered.contains("blocked: 3 (contested 2, occupied 1"));
}
