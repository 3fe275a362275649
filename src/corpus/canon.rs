//! 正典静态表
//!
//! 66 卷书的章节与每章经文数，经文索引和引用解析共用这一张表。

/// 约别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Testament {
    Old,
    New,
}

/// 单卷书的静态描述
#[derive(Debug, Clone, Copy)]
pub struct BookSpec {
    /// 稳定的书卷 ID（小写，无空格）
    pub id: &'static str,
    /// 译本文档中使用的书名
    pub name: &'static str,
    pub testament: Testament,
    /// 额外接受的别名（缩写等）
    pub aliases: &'static [&'static str],
    /// 每章经文数，下标 0 对应第 1 章
    pub verses: &'static [u16],
}

impl BookSpec {
    /// 章数
    pub fn chapter_count(&self) -> usize {
        self.verses.len()
    }

    /// 本卷经文总数
    pub fn verse_count(&self) -> usize {
        self.verses.iter().map(|&v| v as usize).sum()
    }
}

/// 正典总经文数
pub const CANON_VERSE_COUNT: usize = 31_102;

/// 正典书卷表（按正典顺序）
pub static CANON: &[BookSpec] = &[
    BookSpec {
        id: "genesis",
        name: "Genesis",
        testament: Testament::Old,
        aliases: &["gen"],
        verses: &[
            31, 25, 24, 26, 32, 22, 24, 22, 29, 32, 32, 20, 18, 24, 21, 16, 27, 33, 38, 18, 34,
            24, 20, 67, 34, 35, 46, 22, 35, 43, 55, 32, 20, 31, 29, 43, 36, 30, 23, 23, 57, 38,
            34, 34, 28, 34, 31, 22, 33, 26
        ],
    },
    BookSpec {
        id: "exodus",
        name: "Exodus",
        testament: Testament::Old,
        aliases: &["exo"],
        verses: &[
            22, 25, 22, 31, 23, 30, 25, 32, 35, 29, 10, 51, 22, 31, 27, 36, 16, 27, 25, 26, 36,
            31, 33, 18, 40, 37, 21, 43, 46, 38, 18, 35, 23, 35, 35, 38, 29, 31, 43, 38
        ],
    },
    BookSpec {
        id: "leviticus",
        name: "Leviticus",
        testament: Testament::Old,
        aliases: &["lev"],
        verses: &[
            17, 16, 17, 35, 19, 30, 38, 36, 24, 20, 47, 8, 59, 57, 33, 34, 16, 30, 37, 27, 24,
            33, 44, 23, 55, 46, 34
        ],
    },
    BookSpec {
        id: "numbers",
        name: "Numbers",
        testament: Testament::Old,
        aliases: &["num"],
        verses: &[
            54, 34, 51, 49, 31, 27, 89, 26, 23, 36, 35, 16, 33, 45, 41, 50, 13, 32, 22, 29, 35,
            41, 30, 25, 18, 65, 23, 31, 40, 16, 54, 42, 56, 29, 34, 13
        ],
    },
    BookSpec {
        id: "deuteronomy",
        name: "Deuteronomy",
        testament: Testament::Old,
        aliases: &["deu"],
        verses: &[
            46, 37, 29, 49, 33, 25, 26, 20, 29, 22, 32, 32, 18, 29, 23, 22, 20, 22, 21, 20, 23,
            30, 25, 22, 19, 19, 26, 68, 29, 20, 30, 52, 29, 12
        ],
    },
    BookSpec {
        id: "joshua",
        name: "Joshua",
        testament: Testament::Old,
        aliases: &["jos"],
        verses: &[
            18, 24, 17, 24, 15, 27, 26, 35, 27, 43, 23, 24, 33, 15, 63, 10, 18, 28, 51, 9, 45,
            34, 16, 33
        ],
    },
    BookSpec {
        id: "judges",
        name: "Judges",
        testament: Testament::Old,
        aliases: &["jdg"],
        verses: &[36, 23, 31, 24, 31, 40, 25, 35, 57, 18, 40, 15, 25, 20, 20, 31, 13, 31, 30, 48, 25],
    },
    BookSpec {
        id: "ruth",
        name: "Ruth",
        testament: Testament::Old,
        aliases: &["rut"],
        verses: &[22, 23, 18, 22],
    },
    BookSpec {
        id: "1samuel",
        name: "1 Samuel",
        testament: Testament::Old,
        aliases: &["1sa"],
        verses: &[
            28, 36, 21, 22, 12, 21, 17, 22, 27, 27, 15, 25, 23, 52, 35, 23, 58, 30, 24, 42, 15,
            23, 29, 22, 44, 25, 12, 25, 11, 31, 13
        ],
    },
    BookSpec {
        id: "2samuel",
        name: "2 Samuel",
        testament: Testament::Old,
        aliases: &["2sa"],
        verses: &[
            27, 32, 39, 12, 25, 23, 29, 18, 13, 19, 27, 31, 39, 33, 37, 23, 29, 33, 43, 26, 22,
            51, 39, 25
        ],
    },
    BookSpec {
        id: "1kings",
        name: "1 Kings",
        testament: Testament::Old,
        aliases: &["1ki"],
        verses: &[
            53, 46, 28, 34, 18, 38, 51, 66, 28, 29, 43, 33, 34, 31, 34, 34, 24, 46, 21, 43, 29,
            53
        ],
    },
    BookSpec {
        id: "2kings",
        name: "2 Kings",
        testament: Testament::Old,
        aliases: &["2ki"],
        verses: &[
            18, 25, 27, 44, 27, 33, 20, 29, 37, 36, 21, 21, 25, 29, 38, 20, 41, 37, 37, 21, 26,
            20, 37, 20, 30
        ],
    },
    BookSpec {
        id: "1chronicles",
        name: "1 Chronicles",
        testament: Testament::Old,
        aliases: &["1ch"],
        verses: &[
            54, 55, 24, 43, 26, 81, 40, 40, 44, 14, 47, 40, 14, 17, 29, 43, 27, 17, 19, 8, 30,
            19, 32, 31, 31, 32, 34, 21, 30
        ],
    },
    BookSpec {
        id: "2chronicles",
        name: "2 Chronicles",
        testament: Testament::Old,
        aliases: &["2ch"],
        verses: &[
            17, 18, 17, 22, 14, 42, 22, 18, 31, 19, 23, 16, 22, 15, 19, 14, 19, 34, 11, 37, 20,
            12, 21, 27, 28, 23, 9, 27, 36, 27, 21, 33, 25, 33, 27, 23
        ],
    },
    BookSpec {
        id: "ezra",
        name: "Ezra",
        testament: Testament::Old,
        aliases: &["ezr"],
        verses: &[11, 70, 13, 24, 17, 22, 28, 36, 15, 44],
    },
    BookSpec {
        id: "nehemiah",
        name: "Nehemiah",
        testament: Testament::Old,
        aliases: &["neh"],
        verses: &[11, 20, 32, 23, 19, 19, 73, 18, 38, 39, 36, 47, 31],
    },
    BookSpec {
        id: "esther",
        name: "Esther",
        testament: Testament::Old,
        aliases: &["est"],
        verses: &[22, 23, 15, 17, 14, 14, 10, 17, 32, 3],
    },
    BookSpec {
        id: "job",
        name: "Job",
        testament: Testament::Old,
        aliases: &[],
        verses: &[
            22, 13, 26, 21, 27, 30, 21, 22, 35, 22, 20, 25, 28, 22, 35, 22, 16, 21, 29, 29, 34,
            30, 17, 25, 6, 14, 23, 28, 25, 31, 40, 22, 33, 37, 16, 33, 24, 41, 30, 24, 34, 17
        ],
    },
    BookSpec {
        id: "psalms",
        name: "Psalms",
        testament: Testament::Old,
        aliases: &["psalm", "psa"],
        verses: &[
            6, 12, 8, 8, 12, 10, 17, 9, 20, 18, 7, 8, 6, 7, 5, 11, 15, 50, 14, 9, 13, 31, 6,
            10, 22, 12, 14, 9, 11, 12, 24, 11, 22, 22, 28, 12, 40, 22, 13, 17, 13, 11, 5, 26,
            17, 11, 9, 14, 20, 23, 19, 9, 6, 7, 23, 13, 11, 11, 17, 12, 8, 12, 11, 10, 13, 20,
            7, 35, 36, 5, 24, 20, 28, 23, 10, 12, 20, 72, 13, 19, 16, 8, 18, 12, 13, 17, 7, 18,
            52, 17, 16, 15, 5, 23, 11, 13, 12, 9, 9, 5, 8, 28, 22, 35, 45, 48, 43, 13, 31, 7,
            10, 10, 9, 8, 18, 19, 2, 29, 176, 7, 8, 9, 4, 8, 5, 6, 5, 6, 8, 8, 3, 18, 3, 3, 21,
            26, 9, 8, 24, 13, 10, 7, 12, 15, 21, 10, 20, 14, 9, 6
        ],
    },
    BookSpec {
        id: "proverbs",
        name: "Proverbs",
        testament: Testament::Old,
        aliases: &["pro"],
        verses: &[
            33, 22, 35, 27, 23, 35, 27, 36, 18, 32, 31, 28, 25, 35, 33, 33, 28, 24, 29, 30, 31,
            29, 35, 34, 28, 28, 27, 28, 27, 33, 31
        ],
    },
    BookSpec {
        id: "ecclesiastes",
        name: "Ecclesiastes",
        testament: Testament::Old,
        aliases: &["ecc"],
        verses: &[18, 26, 22, 16, 20, 12, 29, 17, 18, 20, 10, 14],
    },
    BookSpec {
        id: "song_of_solomon",
        name: "Song of Solomon",
        testament: Testament::Old,
        aliases: &["songofsolomon", "songofsongs", "song_of_songs", "sng"],
        verses: &[17, 17, 11, 16, 16, 13, 13, 14],
    },
    BookSpec {
        id: "isaiah",
        name: "Isaiah",
        testament: Testament::Old,
        aliases: &["isa"],
        verses: &[
            31, 22, 26, 6, 30, 13, 25, 22, 21, 34, 16, 6, 22, 32, 9, 14, 14, 7, 25, 6, 17, 25,
            18, 23, 12, 21, 13, 29, 24, 33, 9, 20, 24, 17, 10, 22, 38, 22, 8, 31, 29, 25, 28,
            28, 25, 13, 15, 22, 26, 11, 23, 15, 12, 17, 13, 12, 21, 14, 21, 22, 11, 12, 19, 12,
            25, 24
        ],
    },
    BookSpec {
        id: "jeremiah",
        name: "Jeremiah",
        testament: Testament::Old,
        aliases: &["jer"],
        verses: &[
            19, 37, 25, 31, 31, 30, 34, 22, 26, 25, 23, 17, 27, 22, 21, 21, 27, 23, 15, 18, 14,
            30, 40, 10, 38, 24, 22, 17, 32, 24, 40, 44, 26, 22, 19, 32, 21, 28, 18, 16, 18, 22,
            13, 30, 5, 28, 7, 47, 39, 46, 64, 34
        ],
    },
    BookSpec {
        id: "lamentations",
        name: "Lamentations",
        testament: Testament::Old,
        aliases: &["lam"],
        verses: &[22, 22, 66, 22, 22],
    },
    BookSpec {
        id: "ezekiel",
        name: "Ezekiel",
        testament: Testament::Old,
        aliases: &["ezk"],
        verses: &[
            28, 10, 27, 17, 17, 14, 27, 18, 11, 22, 25, 28, 23, 23, 8, 63, 24, 32, 14, 49, 32,
            31, 49, 27, 17, 21, 36, 26, 21, 26, 18, 32, 33, 31, 15, 38, 28, 23, 29, 49, 26, 20,
            27, 31, 25, 24, 23, 35
        ],
    },
    BookSpec {
        id: "daniel",
        name: "Daniel",
        testament: Testament::Old,
        aliases: &["dan"],
        verses: &[21, 49, 30, 37, 31, 28, 28, 27, 27, 21, 45, 13],
    },
    BookSpec {
        id: "hosea",
        name: "Hosea",
        testament: Testament::Old,
        aliases: &["hos"],
        verses: &[11, 23, 5, 19, 15, 11, 16, 14, 17, 15, 12, 14, 16, 9],
    },
    BookSpec {
        id: "joel",
        name: "Joel",
        testament: Testament::Old,
        aliases: &["jol"],
        verses: &[20, 32, 21],
    },
    BookSpec {
        id: "amos",
        name: "Amos",
        testament: Testament::Old,
        aliases: &["amo"],
        verses: &[15, 16, 15, 13, 27, 14, 17, 14, 15],
    },
    BookSpec {
        id: "obadiah",
        name: "Obadiah",
        testament: Testament::Old,
        aliases: &["oba"],
        verses: &[21],
    },
    BookSpec {
        id: "jonah",
        name: "Jonah",
        testament: Testament::Old,
        aliases: &["jon"],
        verses: &[17, 10, 10, 11],
    },
    BookSpec {
        id: "micah",
        name: "Micah",
        testament: Testament::Old,
        aliases: &["mic"],
        verses: &[16, 13, 12, 13, 15, 16, 20],
    },
    BookSpec {
        id: "nahum",
        name: "Nahum",
        testament: Testament::Old,
        aliases: &["nam"],
        verses: &[15, 13, 19],
    },
    BookSpec {
        id: "habakkuk",
        name: "Habakkuk",
        testament: Testament::Old,
        aliases: &["hab"],
        verses: &[17, 20, 19],
    },
    BookSpec {
        id: "zephaniah",
        name: "Zephaniah",
        testament: Testament::Old,
        aliases: &["zep"],
        verses: &[18, 15, 20],
    },
    BookSpec {
        id: "haggai",
        name: "Haggai",
        testament: Testament::Old,
        aliases: &["hag"],
        verses: &[15, 23],
    },
    BookSpec {
        id: "zechariah",
        name: "Zechariah",
        testament: Testament::Old,
        aliases: &["zec"],
        verses: &[21, 13, 10, 14, 11, 15, 14, 23, 17, 12, 17, 14, 9, 21],
    },
    BookSpec {
        id: "malachi",
        name: "Malachi",
        testament: Testament::Old,
        aliases: &["mal"],
        verses: &[14, 17, 18, 6],
    },
    BookSpec {
        id: "matthew",
        name: "Matthew",
        testament: Testament::New,
        aliases: &["mat"],
        verses: &[
            25, 23, 17, 25, 48, 34, 29, 34, 38, 42, 30, 50, 58, 36, 39, 28, 27, 35, 30, 34, 46,
            46, 39, 51, 46, 75, 66, 20
        ],
    },
    BookSpec {
        id: "mark",
        name: "Mark",
        testament: Testament::New,
        aliases: &["mrk"],
        verses: &[45, 28, 35, 41, 43, 56, 37, 38, 50, 52, 33, 44, 37, 72, 47, 20],
    },
    BookSpec {
        id: "luke",
        name: "Luke",
        testament: Testament::New,
        aliases: &["luk"],
        verses: &[
            80, 52, 38, 44, 39, 49, 50, 56, 62, 42, 54, 59, 35, 35, 32, 31, 37, 43, 48, 47, 38,
            71, 56, 53
        ],
    },
    BookSpec {
        id: "john",
        name: "John",
        testament: Testament::New,
        aliases: &["jhn"],
        verses: &[51, 25, 36, 54, 47, 71, 53, 59, 41, 42, 57, 50, 38, 31, 27, 33, 26, 40, 42, 31, 25],
    },
    BookSpec {
        id: "acts",
        name: "Acts",
        testament: Testament::New,
        aliases: &["act"],
        verses: &[
            26, 47, 26, 37, 42, 15, 60, 40, 43, 48, 30, 25, 52, 28, 41, 40, 34, 28, 41, 38, 40,
            30, 35, 27, 27, 32, 44, 31
        ],
    },
    BookSpec {
        id: "romans",
        name: "Romans",
        testament: Testament::New,
        aliases: &["rom"],
        verses: &[32, 29, 31, 25, 21, 23, 25, 39, 33, 21, 36, 21, 14, 23, 33, 27],
    },
    BookSpec {
        id: "1corinthians",
        name: "1 Corinthians",
        testament: Testament::New,
        aliases: &["1co"],
        verses: &[31, 16, 23, 21, 13, 20, 40, 13, 27, 33, 34, 31, 13, 40, 58, 24],
    },
    BookSpec {
        id: "2corinthians",
        name: "2 Corinthians",
        testament: Testament::New,
        aliases: &["2co"],
        verses: &[24, 17, 18, 18, 21, 18, 16, 24, 15, 18, 33, 21, 14],
    },
    BookSpec {
        id: "galatians",
        name: "Galatians",
        testament: Testament::New,
        aliases: &["gal"],
        verses: &[24, 21, 29, 31, 26, 18],
    },
    BookSpec {
        id: "ephesians",
        name: "Ephesians",
        testament: Testament::New,
        aliases: &["eph"],
        verses: &[23, 22, 21, 32, 33, 24],
    },
    BookSpec {
        id: "philippians",
        name: "Philippians",
        testament: Testament::New,
        aliases: &["php"],
        verses: &[30, 30, 21, 23],
    },
    BookSpec {
        id: "colossians",
        name: "Colossians",
        testament: Testament::New,
        aliases: &["col"],
        verses: &[29, 23, 25, 18],
    },
    BookSpec {
        id: "1thessalonians",
        name: "1 Thessalonians",
        testament: Testament::New,
        aliases: &["1th"],
        verses: &[10, 20, 13, 18, 28],
    },
    BookSpec {
        id: "2thessalonians",
        name: "2 Thessalonians",
        testament: Testament::New,
        aliases: &["2th"],
        verses: &[12, 17, 18],
    },
    BookSpec {
        id: "1timothy",
        name: "1 Timothy",
        testament: Testament::New,
        aliases: &["1ti"],
        verses: &[20, 15, 16, 16, 25, 21],
    },
    BookSpec {
        id: "2timothy",
        name: "2 Timothy",
        testament: Testament::New,
        aliases: &["2ti"],
        verses: &[18, 26, 17, 22],
    },
    BookSpec {
        id: "titus",
        name: "Titus",
        testament: Testament::New,
        aliases: &["tit"],
        verses: &[16, 15, 15],
    },
    BookSpec {
        id: "philemon",
        name: "Philemon",
        testament: Testament::New,
        aliases: &["phm"],
        verses: &[25],
    },
    BookSpec {
        id: "hebrews",
        name: "Hebrews",
        testament: Testament::New,
        aliases: &["heb"],
        verses: &[14, 18, 19, 16, 14, 20, 28, 13, 28, 39, 40, 29, 25],
    },
    BookSpec {
        id: "james",
        name: "James",
        testament: Testament::New,
        aliases: &["jas"],
        verses: &[27, 26, 18, 17, 20],
    },
    BookSpec {
        id: "1peter",
        name: "1 Peter",
        testament: Testament::New,
        aliases: &["1pe"],
        verses: &[25, 25, 22, 19, 14],
    },
    BookSpec {
        id: "2peter",
        name: "2 Peter",
        testament: Testament::New,
        aliases: &["2pe"],
        verses: &[21, 22, 18],
    },
    BookSpec {
        id: "1john",
        name: "1 John",
        testament: Testament::New,
        aliases: &["1jn"],
        verses: &[10, 29, 24, 21, 21],
    },
    BookSpec {
        id: "2john",
        name: "2 John",
        testament: Testament::New,
        aliases: &["2jn"],
        verses: &[13],
    },
    BookSpec {
        id: "3john",
        name: "3 John",
        testament: Testament::New,
        aliases: &["3jn"],
        verses: &[14],
    },
    BookSpec {
        id: "jude",
        name: "Jude",
        testament: Testament::New,
        aliases: &["jud"],
        verses: &[25],
    },
    BookSpec {
        id: "revelation",
        name: "Revelation",
        testament: Testament::New,
        aliases: &["rev"],
        verses: &[
            20, 29, 22, 11, 14, 17, 17, 13, 21, 11, 19, 17, 18, 20, 8, 21, 18, 24, 21, 15, 27,
            21
        ],
    },
];
