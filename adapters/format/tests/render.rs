use treasure_map_core::{
    Adventurer, CellCoord, Direction, Instruction, MapDimensions, Mountain, Scenario, Treasure,
};
use treasure_map_format::{parse, render, write_scenario};
use treasure_map_system_movement::simulate;

#[test]
fn renders_the_report_layout() {
    let mut scenario = Scenario::new(MapDimensions::new(3, 4));
    scenario.mountains.push(Mountain::new(CellCoord::new(1, 0)));
    scenario.mountains.push(Mountain::new(CellCoord::new(2, 1)));
    scenario
        .treasures
        .push(Treasure::new(CellCoord::new(0, 3), 0));
    scenario
        .treasures
        .push(Treasure::new(CellCoord::new(1, 3), 2));
    scenario.adventurers.push(
        Adventurer::new(
            "Lara",
            CellCoord::new(0, 3),
            Direction::South,
            vec![Instruction::Advance],
        )
        .with_treasures(3),
    );

    let expected = "C - 3 - 4\n\
                    M - 1 - 0\n\
                    M - 2 - 1\n\
                    T - 1 - 3 - 2\n\
                    A - Lara - 0 - 3 - S - 3\n";
    assert_eq!(render(&scenario), expected);

    let mut sink = Vec::new();
    write_scenario(&scenario, &mut sink).expect("writing to a vector succeeds");
    assert_eq!(String::from_utf8(sink).expect("utf-8 output"), expected);
}

#[test]
fn end_to_end_run_drops_depleted_treasures() {
    let input = "C - 3 - 3\nM - 1 - 1\nT - 2 - 2 - 1\nA - Jon - 0 - 0 - E - AADAAAGA\n";
    let scenario = parse(input).expect("input parses");

    let output = render(&simulate(scenario));

    assert_eq!(output, "C - 3 - 3\nM - 1 - 1\nA - Jon - 2 - 2 - E - 1\n");
}

#[test]
fn legacy_reference_example() {
    let input = "C - 3 - 4\n\
                 M - 1 - 0\n\
                 M - 2 - 1\n\
                 T - 0 - 3 - 2\n\
                 T - 1 - 3 - 3\n\
                 A - Lara - 1 - 1 - S - AADADAGGA\n";
    let scenario = parse(input).expect("input parses");

    let output = render(&simulate(scenario));

    assert_eq!(
        output,
        "C - 3 - 4\n\
         M - 1 - 0\n\
         M - 2 - 1\n\
         T - 1 - 3 - 2\n\
         A - Lara - 0 - 3 - S - 3\n"
    );
}
