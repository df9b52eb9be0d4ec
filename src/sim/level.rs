//! Level grid: authored templates and the mutable runtime grid
//!
//! Templates are validated once when a pack is built. Loading a template into a
//! [`Level`] cannot fail; it only resolves randomized cells.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{MULTI_HIT_MAX, RANDOM_MULTI_HIT_MIN};

/// Contents of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    Wall,
    Breakable,
    Unbreakable,
    Powerup,
    /// Needs `hp` more hits, always in 1..=11
    MultiHit { hp: u8 },
    BallSpawn,
    PaddleSpawn,
}

impl CellKind {
    /// Parse an authored glyph. `'?'` is not a cell; see [`TemplateCell`].
    pub fn from_glyph(glyph: char) -> Option<Self> {
        let kind = match glyph {
            ' ' => CellKind::Empty,
            '#' => CellKind::Wall,
            '@' => CellKind::Breakable,
            'X' => CellKind::Unbreakable,
            'S' => CellKind::Powerup,
            '*' => CellKind::BallSpawn,
            '=' => CellKind::PaddleSpawn,
            '1'..='9' => CellKind::MultiHit {
                hp: glyph.to_digit(10)? as u8,
            },
            'A' => CellKind::MultiHit { hp: 10 },
            'B' => CellKind::MultiHit { hp: 11 },
            _ => return None,
        };
        Some(kind)
    }

    /// Authored glyph for this cell
    pub fn glyph(self) -> char {
        match self {
            CellKind::Empty => ' ',
            CellKind::Wall => '#',
            CellKind::Breakable => '@',
            CellKind::Unbreakable => 'X',
            CellKind::Powerup => 'S',
            CellKind::BallSpawn => '*',
            CellKind::PaddleSpawn => '=',
            CellKind::MultiHit { hp: 10 } => 'A',
            CellKind::MultiHit { hp: 11 } => 'B',
            CellKind::MultiHit { hp } => {
                debug_assert!(
                    (1..=MULTI_HIT_MAX).contains(&hp),
                    "multi-hit block with {hp} hitpoints"
                );
                char::from_digit(u32::from(hp.clamp(1, 9)), 10).unwrap_or('1')
            }
        }
    }

    /// Hitpoint label drawn on multi-hit blocks ("1".."11")
    pub fn hit_label(self) -> Option<String> {
        match self {
            CellKind::MultiHit { hp } => Some(hp.to_string()),
            _ => None,
        }
    }

    /// Counts toward the blocks-remaining total
    pub fn is_destructible(self) -> bool {
        matches!(
            self,
            CellKind::Breakable | CellKind::Powerup | CellKind::MultiHit { .. }
        )
    }
}

/// A cell as authored, before randomized cells are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateCell {
    Fixed(CellKind),
    /// `'?'`: becomes a multi-hit block with 2..=11 hitpoints at load
    RandomMultiHit,
}

impl TemplateCell {
    fn from_glyph(glyph: char) -> Option<Self> {
        if glyph == '?' {
            Some(TemplateCell::RandomMultiHit)
        } else {
            CellKind::from_glyph(glyph).map(TemplateCell::Fixed)
        }
    }
}

/// Errors raised while validating authored level data
#[derive(Debug)]
pub enum LevelError {
    EmptyLevel {
        name: String,
    },
    RaggedRow {
        name: String,
        row: usize,
        expected: usize,
        found: usize,
    },
    UnknownGlyph {
        name: String,
        row: usize,
        column: usize,
        glyph: char,
    },
    BallSpawnCount {
        name: String,
        found: usize,
    },
    EmptyPack,
    Json(serde_json::Error),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::EmptyLevel { name } => write!(f, "level '{name}' has no cells"),
            LevelError::RaggedRow {
                name,
                row,
                expected,
                found,
            } => write!(
                f,
                "level '{name}' row {row} has {found} columns, expected {expected}"
            ),
            LevelError::UnknownGlyph {
                name,
                row,
                column,
                glyph,
            } => write!(
                f,
                "level '{name}' has unknown glyph {glyph:?} at row {row}, column {column}"
            ),
            LevelError::BallSpawnCount { name, found } => write!(
                f,
                "level '{name}' needs exactly one ball spawn, found {found}"
            ),
            LevelError::EmptyPack => write!(f, "level pack contains no levels"),
            LevelError::Json(err) => write!(f, "invalid level pack JSON: {err}"),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(err: serde_json::Error) -> Self {
        LevelError::Json(err)
    }
}

/// Immutable, validated level layout
#[derive(Debug, Clone)]
pub struct LevelTemplate {
    pub name: String,
    rows: usize,
    columns: usize,
    cells: Vec<TemplateCell>,
}

impl LevelTemplate {
    /// Parse and validate authored rows
    pub fn parse<S: AsRef<str>>(name: &str, lines: &[S]) -> Result<Self, LevelError> {
        let columns = lines.first().map(|l| l.as_ref().chars().count()).unwrap_or(0);
        if columns == 0 {
            return Err(LevelError::EmptyLevel {
                name: name.to_string(),
            });
        }

        let mut cells = Vec::with_capacity(lines.len() * columns);
        let mut spawns = 0;
        for (row, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != columns {
                return Err(LevelError::RaggedRow {
                    name: name.to_string(),
                    row,
                    expected: columns,
                    found,
                });
            }
            for (column, glyph) in line.chars().enumerate() {
                let cell = TemplateCell::from_glyph(glyph).ok_or_else(|| LevelError::UnknownGlyph {
                    name: name.to_string(),
                    row,
                    column,
                    glyph,
                })?;
                if cell == TemplateCell::Fixed(CellKind::BallSpawn) {
                    spawns += 1;
                }
                cells.push(cell);
            }
        }

        if spawns != 1 {
            return Err(LevelError::BallSpawnCount {
                name: name.to_string(),
                found: spawns,
            });
        }

        Ok(Self {
            name: name.to_string(),
            rows: lines.len(),
            columns,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }
}

/// Mutable runtime grid for the level being played (row-major)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    rows: usize,
    columns: usize,
    cells: Vec<CellKind>,
}

impl Level {
    /// Grid of a single cell kind
    pub fn filled(rows: usize, columns: usize, kind: CellKind) -> Self {
        Self {
            rows,
            columns,
            cells: vec![kind; rows * columns],
        }
    }

    /// Copy a template into a fresh grid, rolling hitpoints for `'?'` cells
    pub fn load<R: Rng>(template: &LevelTemplate, rng: &mut R) -> Self {
        let cells = template
            .cells
            .iter()
            .map(|cell| match *cell {
                TemplateCell::Fixed(kind) => kind,
                TemplateCell::RandomMultiHit => CellKind::MultiHit {
                    hp: rng.random_range(RANDOM_MULTI_HIT_MIN..=MULTI_HIT_MAX),
                },
            })
            .collect();

        Self {
            rows: template.rows,
            columns: template.columns,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Whether (row, column) addresses a cell of this grid
    #[inline]
    pub fn in_bounds(&self, row: i32, column: i32) -> bool {
        row >= 0 && (row as usize) < self.rows && column >= 0 && (column as usize) < self.columns
    }

    #[inline]
    fn index(&self, row: usize, column: usize) -> usize {
        debug_assert!(
            row < self.rows && column < self.columns,
            "cell ({row}, {column}) outside {}x{} grid",
            self.rows,
            self.columns
        );
        row * self.columns + column
    }

    /// Read a cell. Callers must check [`Level::in_bounds`] first.
    pub fn cell(&self, row: usize, column: usize) -> CellKind {
        self.cells[self.index(row, column)]
    }

    /// Overwrite a cell. Callers must check [`Level::in_bounds`] first.
    pub fn set_cell(&mut self, row: usize, column: usize, kind: CellKind) {
        let index = self.index(row, column);
        self.cells[index] = kind;
    }

    /// One row of cells, for drawing
    pub fn row(&self, row: usize) -> &[CellKind] {
        let start = self.index(row, 0);
        &self.cells[start..start + self.columns]
    }

    /// Number of cells that must be destroyed to clear the level
    pub fn destructible_count(&self) -> u32 {
        self.cells.iter().filter(|c| c.is_destructible()).count() as u32
    }

    /// First cell of `kind` in row-major order
    pub fn find(&self, kind: CellKind) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|&c| c == kind)
            .map(|i| (i / self.columns, i % self.columns))
    }

    /// Find a marker cell and replace it with `Empty`
    pub fn take_marker(&mut self, kind: CellKind) -> Option<(usize, usize)> {
        let (row, column) = self.find(kind)?;
        self.set_cell(row, column, CellKind::Empty);
        Some((row, column))
    }
}

#[derive(Deserialize)]
struct RawLevel {
    name: String,
    rows: Vec<String>,
}

#[derive(Deserialize)]
struct RawPack {
    levels: Vec<RawLevel>,
}

/// Ordered sequence of validated levels
#[derive(Debug, Clone)]
pub struct LevelPack {
    levels: Vec<LevelTemplate>,
}

impl LevelPack {
    pub fn new(levels: Vec<LevelTemplate>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::EmptyPack);
        }
        Ok(Self { levels })
    }

    /// Parse `{"levels":[{"name":"..","rows":[".."]}]}`
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let raw: RawPack = serde_json::from_str(json)?;
        let levels = raw
            .levels
            .iter()
            .map(|level| LevelTemplate::parse(&level.name, &level.rows))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(levels)
    }

    /// The five levels shipped with the game
    pub fn builtin() -> Result<Self, LevelError> {
        let levels = BUILTIN_LEVELS
            .iter()
            .map(|&(name, rows)| LevelTemplate::parse(name, rows))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(levels)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelTemplate> {
        self.levels.get(index)
    }
}

const BUILTIN_LEVELS: &[(&str, &[&str])] = &[
    (
        "Opening Wall",
        &[
            "################",
            "#              #",
            "# @@@@@@@@@@@@ #",
            "# @@@@@@@@@@@@ #",
            "# @@@@@@@@@@@@ #",
            "#              #",
            "#              #",
            "#              #",
            "#       *      #",
            "#              #",
            "#              #",
            "#     =        #",
            "#              #",
        ],
    ),
    (
        "Iron Teeth",
        &[
            "################",
            "#              #",
            "# @@@S@@@@S@@@ #",
            "# X@@@@XX@@@@X #",
            "# @@S@@@@@@S@@ #",
            "#  X   XX   X  #",
            "#              #",
            "#              #",
            "#       *      #",
            "#              #",
            "#              #",
            "#     =        #",
            "#              #",
        ],
    ),
    (
        "Countdown",
        &[
            "################",
            "#              #",
            "# 333333333333 #",
            "# 222222222222 #",
            "# 111111111111 #",
            "# @@@@SS@@@@@@ #",
            "#              #",
            "#              #",
            "#       *      #",
            "#              #",
            "#              #",
            "#     =        #",
            "#              #",
        ],
    ),
    (
        "Dice Roll",
        &[
            "################",
            "#              #",
            "#  ??  ??  ??  #",
            "# @@@@@@@@@@@@ #",
            "#  X?X    X?X  #",
            "# S@@@@@@@@@@S #",
            "#              #",
            "#              #",
            "#       *      #",
            "#              #",
            "#              #",
            "#     =        #",
            "#              #",
        ],
    ),
    (
        "Fortress",
        &[
            "################",
            "#XXXXXX  XXXXXX#",
            "#X BA9    9AB X#",
            "#X 5@@@SS@@@5 X#",
            "#X ?@@@@@@@@? X#",
            "#X  XX    XX  X#",
            "#              #",
            "#              #",
            "#       *      #",
            "#              #",
            "#              #",
            "#     =        #",
            "#              #",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_builtin_pack_is_complete() {
        let pack = LevelPack::builtin().unwrap();
        assert_eq!(pack.len(), BUILTIN_LEVELS.len());
        assert!(!pack.is_empty());
    }

    #[test]
    fn test_glyph_table() {
        for glyph in " #@XS*=123456789AB".chars() {
            let kind = CellKind::from_glyph(glyph).unwrap();
            assert_eq!(kind.glyph(), glyph);
        }
        assert_eq!(CellKind::from_glyph('?'), None);
        assert_eq!(CellKind::from_glyph('A'), Some(CellKind::MultiHit { hp: 10 }));
        assert_eq!(CellKind::MultiHit { hp: 11 }.hit_label().as_deref(), Some("11"));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "multi-hit block with 12 hitpoints")]
    fn test_glyph_rejects_out_of_range_hitpoints() {
        CellKind::MultiHit { hp: 12 }.glyph();
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = LevelTemplate::parse("bad", &["###", "#*", "###"]).unwrap_err();
        assert!(matches!(
            err,
            LevelError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_glyph_rejected() {
        let err = LevelTemplate::parse("bad", &["#*%"]).unwrap_err();
        assert!(matches!(
            err,
            LevelError::UnknownGlyph {
                column: 2,
                glyph: '%',
                ..
            }
        ));
    }

    #[test]
    fn test_spawn_required() {
        let err = LevelTemplate::parse("bad", &["#@#"]).unwrap_err();
        assert!(matches!(err, LevelError::BallSpawnCount { found: 0, .. }));
        let err = LevelTemplate::parse("bad", &["*@*"]).unwrap_err();
        assert!(matches!(err, LevelError::BallSpawnCount { found: 2, .. }));
    }

    #[test]
    fn test_pack_from_json() {
        let pack = LevelPack::from_json(r##"{"levels":[{"name":"tiny","rows":["#@#","#*#"]}]}"##)
            .unwrap();
        assert_eq!(pack.len(), 1);
        let template = pack.get(0).unwrap();
        assert_eq!((template.rows(), template.columns()), (2, 3));

        assert!(matches!(
            LevelPack::from_json(r#"{"levels":[]}"#),
            Err(LevelError::EmptyPack)
        ));
        assert!(matches!(
            LevelPack::from_json("not json"),
            Err(LevelError::Json(_))
        ));
    }

    #[test]
    fn test_take_marker_consumes_first_row_major() {
        let template = LevelTemplate::parse("m", &["  =", "*= "]).unwrap();
        let mut level = Level::load(&template, &mut Pcg32::seed_from_u64(1));
        assert_eq!(level.take_marker(CellKind::PaddleSpawn), Some((0, 2)));
        assert_eq!(level.cell(0, 2), CellKind::Empty);
        assert_eq!(level.take_marker(CellKind::PaddleSpawn), Some((1, 1)));
        assert_eq!(level.take_marker(CellKind::PaddleSpawn), None);
    }

    #[test]
    fn test_in_bounds() {
        let level = Level::filled(3, 4, CellKind::Empty);
        assert!(level.in_bounds(0, 0));
        assert!(level.in_bounds(2, 3));
        assert!(!level.in_bounds(-1, 0));
        assert!(!level.in_bounds(0, -1));
        assert!(!level.in_bounds(3, 0));
        assert!(!level.in_bounds(0, 4));
    }

    proptest! {
        #[test]
        fn prop_load_resolves_random_cells(seed in any::<u64>(), index in 0usize..5) {
            let pack = LevelPack::builtin().unwrap();
            let template = pack.get(index).unwrap();
            let level = Level::load(template, &mut Pcg32::seed_from_u64(seed));

            let mut expected = 0;
            for (i, cell) in template.cells.iter().enumerate() {
                let loaded = level.cells[i];
                match cell {
                    TemplateCell::RandomMultiHit => {
                        let CellKind::MultiHit { hp } = loaded else {
                            panic!("random cell resolved to {loaded:?}");
                        };
                        prop_assert!((RANDOM_MULTI_HIT_MIN..=MULTI_HIT_MAX).contains(&hp));
                    }
                    TemplateCell::Fixed(kind) => prop_assert_eq!(*kind, loaded),
                }
                if loaded.is_destructible() {
                    expected += 1;
                }
            }
            prop_assert_eq!(level.destructible_count(), expected);
        }
    }
}
