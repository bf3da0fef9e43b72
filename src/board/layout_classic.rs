// Classic board layout: five snakes, five ladders.
// Fixed (not randomized) so replays are reproducible across sessions.
use super::Hazard;

pub static CLASSIC_SNAKES: [Hazard; 5] = [
    Hazard::snake(98, 28),
    Hazard::snake(87, 24),
    Hazard::snake(64, 19),
    Hazard::snake(54, 34),
    Hazard::snake(31, 7),
];

pub static CLASSIC_LADDERS: [Hazard; 5] = [
    Hazard::ladder(4, 56),
    Hazard::ladder(12, 50),
    Hazard::ladder(22, 58),
    Hazard::ladder(41, 79),
    Hazard::ladder(63, 95),
];
