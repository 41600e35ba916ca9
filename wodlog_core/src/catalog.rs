//! Standard catalog of movements and benchmark WODs.
//!
//! A new library starts from this set. Imported names that match one of
//! these entries reuse it instead of creating a user entry.

use crate::types::{MovementType, NewMovement, NewWod, ScoreType};
use once_cell::sync::Lazy;

/// Seed entries for a new library
#[derive(Clone, Debug)]
pub struct StandardCatalog {
    pub movements: Vec<NewMovement>,
    pub wods: Vec<NewWod>,
}

/// Cached standard catalog, built once
static STANDARD_CATALOG: Lazy<StandardCatalog> = Lazy::new(build_standard_catalog);

/// Get a reference to the cached standard catalog
pub fn get_standard_catalog() -> &'static StandardCatalog {
    &STANDARD_CATALOG
}

use MovementType::{Bodyweight, Cardio, Gymnastics, Weightlifting};

const STANDARD_MOVEMENTS: &[(&str, &str, MovementType)] = &[
    // Weightlifting
    ("Back Squat", "Barbell squat with bar on back", Weightlifting),
    ("Front Squat", "Barbell squat with bar on front shoulders", Weightlifting),
    ("Overhead Squat", "Squat with barbell held overhead", Weightlifting),
    ("Deadlift", "Lift barbell from ground to standing position", Weightlifting),
    ("Sumo Deadlift High Pull", "Wide stance deadlift pulling to chin", Weightlifting),
    ("Clean", "Lift barbell from ground to shoulders", Weightlifting),
    ("Power Clean", "Clean without full squat", Weightlifting),
    ("Hang Clean", "Clean starting from hang position", Weightlifting),
    ("Squat Clean", "Clean with full squat catch", Weightlifting),
    ("Snatch", "Lift barbell from ground to overhead in one motion", Weightlifting),
    ("Power Snatch", "Snatch without full squat", Weightlifting),
    ("Hang Snatch", "Snatch starting from hang position", Weightlifting),
    ("Clean and Jerk", "Clean followed by overhead jerk", Weightlifting),
    ("Thruster", "Front squat to overhead press", Weightlifting),
    ("Push Press", "Overhead press with leg drive", Weightlifting),
    ("Push Jerk", "Overhead jerk with dip under", Weightlifting),
    ("Split Jerk", "Overhead jerk with split stance", Weightlifting),
    ("Bench Press", "Press barbell from chest while lying on bench", Weightlifting),
    ("Overhead Press", "Strict press barbell from shoulders to overhead", Weightlifting),
    ("Shoulder Press", "Overhead press variation", Weightlifting),
    // Gymnastics
    ("Pull-up", "Pull body up to bar, chin over bar", Gymnastics),
    ("Chest-to-Bar Pull-up", "Pull-up bringing chest to bar", Gymnastics),
    ("Strict Pull-up", "Pull-up without kipping motion", Gymnastics),
    ("Kipping Pull-up", "Pull-up using hip swing for momentum", Gymnastics),
    ("Muscle-up", "Pull-up transitioning to dip above rings or bar", Gymnastics),
    ("Bar Muscle-up", "Muscle-up performed on pull-up bar", Gymnastics),
    ("Ring Muscle-up", "Muscle-up performed on gymnastic rings", Gymnastics),
    ("Handstand Push-up", "Push-up performed in handstand position", Gymnastics),
    ("Strict Handstand Push-up", "Handstand push-up without kipping", Gymnastics),
    ("Kipping Handstand Push-up", "Handstand push-up with kipping motion", Gymnastics),
    ("Dip", "Lower and press body between parallel bars or rings", Gymnastics),
    ("Ring Dip", "Dip performed on gymnastic rings", Gymnastics),
    ("Toes-to-Bar", "Hang from bar and bring toes to touch bar", Gymnastics),
    ("Knees-to-Elbow", "Hang from bar and bring knees to elbows", Gymnastics),
    ("L-Sit", "Hold body in L-shape while supported", Gymnastics),
    ("Handstand Hold", "Hold inverted position on hands", Gymnastics),
    ("Handstand Walk", "Walk on hands while inverted", Gymnastics),
    ("Rope Climb", "Climb rope using arms and legs", Gymnastics),
    // Bodyweight
    ("Push-up", "Press body up from prone position", Bodyweight),
    ("Sit-up", "Raise torso from supine to sitting position", Bodyweight),
    ("Air Squat", "Bodyweight squat", Bodyweight),
    ("Burpee", "Squat thrust to plank, push-up, jump up", Bodyweight),
    ("Box Jump", "Jump onto elevated platform", Bodyweight),
    ("Step-up", "Step onto elevated platform", Bodyweight),
    ("Lunge", "Step forward lowering back knee toward ground", Bodyweight),
    ("Walking Lunge", "Lunge while moving forward", Bodyweight),
    ("Jump Squat", "Squat with explosive jump", Bodyweight),
    ("Pistol Squat", "Single-leg squat", Bodyweight),
    ("Plank Hold", "Hold body in straight line on forearms", Bodyweight),
    ("Hollow Hold", "Hold body in hollow position on back", Bodyweight),
    ("Arch Hold", "Hold body in arched position on stomach", Bodyweight),
    // Cardio
    ("Row", "Rowing machine for distance or calories", Cardio),
    ("Run", "Running for distance or time", Cardio),
    ("Bike", "Stationary bike for distance or calories", Cardio),
    ("Ski Erg", "Ski ergometer for distance or calories", Cardio),
    ("Assault Bike", "Air resistance bike for calories", Cardio),
    ("Jump Rope", "Single or double under rope jumps", Cardio),
    ("Double Under", "Jump rope passing twice under feet per jump", Cardio),
    ("Single Under", "Jump rope passing once under feet per jump", Cardio),
    ("Shuttle Run", "Sprint back and forth between two points", Cardio),
    // Olympic Lifting Accessories
    ("Hang Power Clean", "Power clean from hang position", Weightlifting),
    ("Hang Power Snatch", "Power snatch from hang position", Weightlifting),
    ("Squat Snatch", "Snatch with full squat catch", Weightlifting),
    ("Pause Squat", "Squat with pause at bottom", Weightlifting),
    ("Box Squat", "Squat to box or bench", Weightlifting),
    ("Good Morning", "Hip hinge with barbell on back", Weightlifting),
    ("Romanian Deadlift", "Deadlift with straight legs", Weightlifting),
    ("Kettlebell Swing", "Hip hinge swinging kettlebell", Weightlifting),
    ("Turkish Get-up", "Rising from ground to standing with weight overhead", Weightlifting),
    // Strongman
    ("Farmer Carry", "Walk carrying heavy weights in each hand", Weightlifting),
    ("Sled Push", "Push weighted sled", Cardio),
    ("Sled Pull", "Pull weighted sled", Cardio),
    ("Yoke Carry", "Walk with weighted yoke on shoulders", Weightlifting),
    // Core
    ("GHD Sit-up", "Sit-up on glute-ham developer", Gymnastics),
    ("V-up", "Simultaneous leg and torso raise to V-shape", Bodyweight),
    ("Russian Twist", "Seated torso rotation", Bodyweight),
    ("AbMat Sit-up", "Sit-up with abdominal mat", Bodyweight),
    // Accessory
    ("Wall Ball", "Squat and throw medicine ball to target", Weightlifting),
    ("Medicine Ball Clean", "Clean with medicine ball", Weightlifting),
    ("Dumbbell Snatch", "Snatch with single dumbbell", Weightlifting),
    ("Dumbbell Thruster", "Thruster with dumbbells", Weightlifting),
    ("Devil Press", "Burpee with dumbbell snatch", Weightlifting),
];

struct WodSeed {
    name: &'static str,
    wod_type: &'static str,
    regime: &'static str,
    score_type: ScoreType,
    description: &'static str,
}

const STANDARD_WODS: &[WodSeed] = &[
    // Girls
    WodSeed {
        name: "Fran",
        wod_type: "Girl",
        regime: "Fastest Time",
        score_type: ScoreType::Time,
        description: "21-15-9 reps for time of: Thrusters (95/65 lb), Pull-ups",
    },
    WodSeed {
        name: "Helen",
        wod_type: "Girl",
        regime: "Fastest Time",
        score_type: ScoreType::Time,
        description: "3 rounds for time of: 400m Run, 21 Kettlebell Swings (53/35 lb), 12 Pull-ups",
    },
    WodSeed {
        name: "Cindy",
        wod_type: "Girl",
        regime: "AMRAP",
        score_type: ScoreType::RoundsReps,
        description: "20 min AMRAP of: 5 Pull-ups, 10 Push-ups, 15 Air Squats",
    },
    WodSeed {
        name: "Grace",
        wod_type: "Girl",
        regime: "Fastest Time",
        score_type: ScoreType::Time,
        description: "30 Clean and Jerks for time (135/95 lb)",
    },
    WodSeed {
        name: "Annie",
        wod_type: "Girl",
        regime: "Fastest Time",
        score_type: ScoreType::Time,
        description: "50-40-30-20-10 reps for time of: Double-Unders, Sit-ups",
    },
    WodSeed {
        name: "Karen",
        wod_type: "Girl",
        regime: "Fastest Time",
        score_type: ScoreType::Time,
        description: "150 Wall Ball Shots for time (20/14 lb, 10/9 ft)",
    },
    WodSeed {
        name: "Diane",
        wod_type: "Girl",
        regime: "Fastest Time",
        score_type: ScoreType::Time,
        description: "21-15-9 reps for time of: Deadlifts (225/155 lb), Handstand Push-ups",
    },
    WodSeed {
        name: "Elizabeth",
        wod_type: "Girl",
        regime: "Fastest Time",
        score_type: ScoreType::Time,
        description: "21-15-9 reps for time of: Cleans (135/95 lb), Dips",
    },
    // Heroes
    WodSeed {
        name: "Murph",
        wod_type: "Hero",
        regime: "Fastest Time",
        score_type: ScoreType::Time,
        description: "For time: 1 mile Run, 100 Pull-ups, 200 Push-ups, 300 Air Squats, 1 mile Run (wear 20 lb vest if possible)",
    },
    WodSeed {
        name: "DT",
        wod_type: "Hero",
        regime: "Fastest Time",
        score_type: ScoreType::Time,
        description: "5 rounds for time of: 12 Deadlifts (155/105 lb), 9 Hang Power Cleans (155/105 lb), 6 Push Jerks (155/105 lb)",
    },
];

fn build_standard_catalog() -> StandardCatalog {
    let movements = STANDARD_MOVEMENTS
        .iter()
        .map(|&(name, description, movement_type)| NewMovement {
            name: name.into(),
            movement_type,
            description: description.into(),
            is_standard: true,
            created_by: None,
        })
        .collect();

    let wods = STANDARD_WODS
        .iter()
        .map(|seed| NewWod {
            name: seed.name.into(),
            source: "CrossFit".into(),
            wod_type: seed.wod_type.into(),
            regime: seed.regime.into(),
            score_type: seed.score_type,
            description: seed.description.into(),
            is_standard: true,
            created_by: None,
        })
        .collect();

    StandardCatalog { movements, wods }
}
