use std::fmt;

use arrayvec::ArrayVec;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const BOTH: [Self; 2] = [Self::White, Self::Black];

    pub const fn to_code(self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'w' => Some(Self::White),
            'b' => Some(Self::Black),
            _ => None,
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank the side's army starts from.
    pub const fn back_rank(self) -> u8 {
        match self {
            Self::White => 9,
            Self::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::White => "white",
            Self::Black => "black",
        })
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PieceType {
    Marshal = 0,
    General = 1,
    LieutenantGeneral = 2,
    MajorGeneral = 3,
    Warrior = 4,
    Lancer = 5,
    Rider = 6,
    Spy = 7,
    Fortress = 8,
    Soldier = 9,
    Cannon = 10,
    Archer = 11,
    Musketeer = 12,
    Tactician = 13,
}

impl PieceType {
    pub const ALL: [Self; 14] = [
        Self::Marshal,
        Self::General,
        Self::LieutenantGeneral,
        Self::MajorGeneral,
        Self::Warrior,
        Self::Lancer,
        Self::Rider,
        Self::Spy,
        Self::Fortress,
        Self::Soldier,
        Self::Cannon,
        Self::Archer,
        Self::Musketeer,
        Self::Tactician,
    ];

    pub const fn kanji(self) -> char {
        match self {
            Self::Marshal => '帥',
            Self::General => '大',
            Self::LieutenantGeneral => '中',
            Self::MajorGeneral => '小',
            Self::Warrior => '侍',
            Self::Lancer => '槍',
            Self::Rider => '馬',
            Self::Spy => '忍',
            Self::Fortress => '砦',
            Self::Soldier => '兵',
            Self::Cannon => '砲',
            Self::Archer => '弓',
            Self::Musketeer => '筒',
            Self::Tactician => '謀',
        }
    }

    pub const fn from_kanji(kanji: char) -> Option<Self> {
        match kanji {
            '帥' => Some(Self::Marshal),
            '大' => Some(Self::General),
            '中' => Some(Self::LieutenantGeneral),
            '小' => Some(Self::MajorGeneral),
            '侍' => Some(Self::Warrior),
            '槍' => Some(Self::Lancer),
            '馬' => Some(Self::Rider),
            '忍' => Some(Self::Spy),
            '砦' => Some(Self::Fortress),
            '兵' => Some(Self::Soldier),
            '砲' => Some(Self::Cannon),
            '弓' => Some(Self::Archer),
            '筒' => Some(Self::Musketeer),
            '謀' => Some(Self::Tactician),
            _ => None,
        }
    }

    /// Lowercase position-string letter; uppercase marks a white piece.
    pub const fn fen_code(self) -> char {
        match self {
            Self::Marshal => 'm',
            Self::General => 'g',
            Self::LieutenantGeneral => 'i',
            Self::MajorGeneral => 'j',
            Self::Warrior => 'w',
            Self::Lancer => 'n',
            Self::Rider => 'r',
            Self::Spy => 's',
            Self::Fortress => 'f',
            Self::Soldier => 'd',
            Self::Cannon => 'c',
            Self::Archer => 'a',
            Self::Musketeer => 'k',
            Self::Tactician => 't',
        }
    }

    pub const fn from_fen_code(code: char) -> Option<Self> {
        match code {
            'm' => Some(Self::Marshal),
            'g' => Some(Self::General),
            'i' => Some(Self::LieutenantGeneral),
            'j' => Some(Self::MajorGeneral),
            'w' => Some(Self::Warrior),
            'n' => Some(Self::Lancer),
            'r' => Some(Self::Rider),
            's' => Some(Self::Spy),
            'f' => Some(Self::Fortress),
            'd' => Some(Self::Soldier),
            'c' => Some(Self::Cannon),
            'a' => Some(Self::Archer),
            'k' => Some(Self::Musketeer),
            't' => Some(Self::Tactician),
            _ => None,
        }
    }

    pub const fn english_name(self) -> &'static str {
        match self {
            Self::Marshal => "marshal",
            Self::General => "general",
            Self::LieutenantGeneral => "lieutenant general",
            Self::MajorGeneral => "major general",
            Self::Warrior => "warrior",
            Self::Lancer => "lancer",
            Self::Rider => "rider",
            Self::Spy => "spy",
            Self::Fortress => "fortress",
            Self::Soldier => "soldier",
            Self::Cannon => "cannon",
            Self::Archer => "archer",
            Self::Musketeer => "musketeer",
            Self::Tactician => "tactician",
        }
    }

    /// Pieces whose forward scan continues past an occupied square.
    pub const fn is_leaper(self) -> bool {
        matches!(self, Self::Cannon | Self::Archer | Self::Musketeer)
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Self { piece_type, color }
    }

    pub const fn fen_char(self) -> char {
        let code = self.piece_type.fen_code();
        match self.color {
            Color::White => code.to_ascii_uppercase(),
            Color::Black => code,
        }
    }

    pub const fn from_fen_char(ch: char) -> Option<Self> {
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match PieceType::from_fen_code(ch.to_ascii_lowercase()) {
            Some(piece_type) => Some(Self { piece_type, color }),
            None => None,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Square {
    pub rank: u8,
    pub file: u8,
}

impl Square {
    pub const fn new(rank: u8, file: u8) -> Option<Self> {
        if rank >= 1 && rank <= 9 && file >= 1 && file <= 9 {
            Some(Self { rank, file })
        } else {
            None
        }
    }

    pub const fn new_unchecked(rank: u8, file: u8) -> Self {
        Self { rank, file }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let (rank, file) = input.split_once('-')?;
        let rank = rank.parse::<u8>().ok()?;
        let file = file.parse::<u8>().ok()?;
        Self::new(rank, file)
    }

    /// Square displaced by `(dr, df)`, or `None` off the board.
    pub fn offset(self, dr: i8, df: i8) -> Option<Self> {
        let rank = i16::from(self.rank) + i16::from(dr);
        let file = i16::from(self.file) + i16::from(df);
        if (1..=9).contains(&rank) && (1..=9).contains(&file) {
            Some(Self::new_unchecked(rank as u8, file as u8))
        } else {
            None
        }
    }

    /// Chebyshev distance.
    pub const fn distance(self, other: Self) -> u8 {
        let dr = self.rank.abs_diff(other.rank);
        let df = self.file.abs_diff(other.file);
        if dr > df {
            dr
        } else {
            df
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.rank, self.file)
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TieredSquare {
    pub square: Square,
    pub tier: u8,
}

impl TieredSquare {
    pub const fn new(square: Square, tier: u8) -> Option<Self> {
        if tier >= 1 && tier <= 3 {
            Some(Self { square, tier })
        } else {
            None
        }
    }

    pub const fn new_unchecked(square: Square, tier: u8) -> Self {
        Self { square, tier }
    }
}

impl fmt::Display for TieredSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.square.rank, self.square.file, self.tier)
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MoveType {
    Route = 0,
    Capture = 1,
    Tsuke = 2,
    Betray = 3,
    Arata = 4,
}

impl MoveType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Route => "route",
            Self::Capture => "capture",
            Self::Tsuke => "tsuke",
            Self::Betray => "betray",
            Self::Arata => "arata",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    pub color: Color,
    pub piece: PieceType,
    /// `None` for hand placements.
    pub from: Option<TieredSquare>,
    pub to: TieredSquare,
    pub move_type: MoveType,
    pub draft_finished: bool,
    /// Enemy pieces removed by a capture or converted by a betray.
    pub captured: ArrayVec<Piece, 3>,
}

impl Move {
    pub fn new(
        color: Color,
        piece: PieceType,
        from: Option<TieredSquare>,
        to: TieredSquare,
        move_type: MoveType,
    ) -> Self {
        Self {
            color,
            piece,
            from,
            to,
            move_type,
            draft_finished: false,
            captured: ArrayVec::new(),
        }
    }

    pub fn moved_piece(&self) -> Piece {
        Piece::new(self.piece, self.color)
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SetupMode {
    Intro = 0,
    Beginner = 1,
    Intermediate = 2,
    Advanced = 3,
}

impl SetupMode {
    pub const ALL: [Self; 4] = [
        Self::Intro,
        Self::Beginner,
        Self::Intermediate,
        Self::Advanced,
    ];

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Intro),
            1 => Some(Self::Beginner),
            2 => Some(Self::Intermediate),
            3 => Some(Self::Advanced),
            _ => None,
        }
    }

    pub const fn to_code(self) -> u8 {
        self as u8
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "intro" | "0" => Some(Self::Intro),
            "beginner" | "1" => Some(Self::Beginner),
            "intermediate" | "2" => Some(Self::Intermediate),
            "advanced" | "3" => Some(Self::Advanced),
            _ => None,
        }
    }

    pub const fn max_tier(self) -> u8 {
        crate::constants::max_tier_for_mode(self)
    }

    /// Whether a moving marshal may tsuke onto another tower.
    pub const fn marshal_can_stack(self) -> bool {
        matches!(self, Self::Intermediate | Self::Advanced)
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandPiece {
    pub piece_type: PieceType,
    pub color: Color,
    pub count: u8,
}

impl HandPiece {
    pub const fn new(piece_type: PieceType, color: Color, count: u8) -> Self {
        Self {
            piece_type,
            color,
            count,
        }
    }
}

pub type MoveList = Vec<Move>;
