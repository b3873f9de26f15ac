//! Hand-curated slang table
//!
//! Chat abbreviations and gambling jargon seen in Indonesian comment sections.
//! Entries here override the remote dataset on conflict. Keys are lowercase.

/// `(slang, formal)` pairs
pub const MANUAL_ENTRIES: &[(&str, &str)] = &[
    // negation
    ("gk", "tidak"),
    ("gak", "tidak"),
    ("g", "tidak"),
    ("tdk", "tidak"),
    ("ga", "tidak"),
    ("nggak", "tidak"),
    ("enggak", "tidak"),
    ("gpp", "tidak apa-apa"),
    ("gakpapa", "tidak apa-apa"),
    // conjunctions and function words
    ("tp", "tapi"),
    ("tapi", "tetapi"),
    ("kl", "kalau"),
    ("klw", "kalau"),
    ("kalo", "kalau"),
    ("klo", "kalau"),
    ("krn", "karena"),
    ("karena", "sebab"),
    ("jd", "jadi"),
    ("sdh", "sudah"),
    ("udh", "sudah"),
    ("udah", "sudah"),
    ("dah", "sudah"),
    ("dl", "dulu"),
    ("sm", "sama"),
    ("sama", "dengan"),
    ("dg", "dengan"),
    ("dr", "dari"),
    ("dri", "dari"),
    ("utk", "untuk"),
    ("yg", "yang"),
    ("jg", "juga"),
    ("jga", "juga"),
    ("d", "di"),
    ("dn", "dan"),
    ("dll", "dan lain-lain"),
    ("dst", "dan seterusnya"),
    ("cs", "dan kawan kawan"),
    ("ttp", "tetap"),
    ("tsb", "tersebut"),
    ("dlm", "dalam"),
    ("pdhl", "padahal"),
    ("drpd", "daripada"),
    ("thdp", "terhadap"),
    ("mnrt", "menurut"),
    ("spt", "seperti"),
    ("kayak", "seperti"),
    ("mirip", "seperti"),
    ("mrp", "seperti"),
    ("gini", "seperti ini"),
    ("gni", "seperti ini"),
    ("begini", "seperti ini"),
    ("biar", "agar"),
    ("supaya", "agar"),
    ("kn", "kan"),
    ("y", "ya"),
    ("ny", "nya"),
    ("sj", "saja"),
    ("msh", "masih"),
    ("bkl", "akan"),
    ("bakal", "akan"),
    ("ap", "apa"),
    ("knp", "kenapa"),
    ("kok", "mengapa"),
    ("mna", "dimana"),
    ("mn", "dimana"),
    ("mana", "dimana"),
    ("mngkin", "mungkin"),
    ("ntar", "nanti"),
    ("nnti", "nanti"),
    ("nti", "nanti"),
    ("smpe", "sampai"),
    ("sampe", "sampai"),
    ("nyampe", "sampai"),
    ("lg", "lagi"),
    ("cm", "cuma"),
    ("cuman", "cuma"),
    ("emg", "memang"),
    ("emng", "memang"),
    ("mmg", "memang"),
    ("smg", "semoga"),
    ("thn", "tahun"),
    ("th", "tahun"),
    ("msk", "masuk"),
    // pronouns and address
    ("mrk", "mereka"),
    ("sy", "saya"),
    ("gw", "saya"),
    ("gue", "saya"),
    ("gua", "saya"),
    ("w", "saya"),
    ("gwe", "saya"),
    ("km", "kamu"),
    ("lu", "kamu"),
    ("lo", "kamu"),
    ("elo", "kamu"),
    ("elu", "kamu"),
    ("loe", "kamu"),
    ("q", "aku"),
    ("ak", "aku"),
    ("aq", "aku"),
    ("ngab", "teman"),
    ("cuy", "teman"),
    ("tmn", "teman"),
    ("tmn2", "teman-teman"),
    ("ngabers", "remaja pria"),
    ("bro", "saudara"),
    ("sis", "kakak"),
    ("bang", "kakak"),
    ("bg", "kakak"),
    ("bng", "kakak"),
    ("kak", "kakak"),
    ("bocil", "anak kecil"),
    ("org", "orang"),
    ("wong", "orang"),
    ("ortu", "orang tua"),
    ("bpk", "bapak"),
    ("bp", "bapak"),
    ("pk", "bapak"),
    // verbs and adjectives
    ("bener", "benar"),
    ("bs", "bisa"),
    ("bsa", "bisa"),
    ("sabi", "bisa"),
    ("bikin", "membuat"),
    ("ksih", "kasih"),
    ("ksh", "kasih"),
    ("jgn", "jangan"),
    ("jngn", "jangan"),
    ("pny", "punya"),
    ("maen", "main"),
    ("demen", "suka"),
    ("klihatan", "terlihat"),
    ("keliatan", "terlihat"),
    ("tilep", "mengambil"),
    ("cilik", "kecil"),
    ("plis", "tolong"),
    ("tlpn", "telepon"),
    ("tlp", "telepon"),
    ("hati2", "hati hati"),
    ("korup", "korupsi"),
    ("sosmed", "sosial media"),
    // interjections and internet slang
    ("bgt", "banget"),
    ("banget", "sekali"),
    ("anjay", "astaga"),
    ("anjir", "astaga"),
    ("anjrit", "astaga"),
    ("jir", "astaga"),
    ("wtf", "astaga"),
    ("wkwk", "haha"),
    ("wkwkwk", "haha"),
    ("wk", "haha"),
    ("lol", "haha"),
    ("ngakak", "tertawa"),
    ("santuy", "santai"),
    ("woles", "santai"),
    ("mager", "malas"),
    ("gabut", "tidak ada kerjaan"),
    ("baper", "terbawa perasaan"),
    ("kepo", "penasaran"),
    ("julid", "iri"),
    ("gibah", "bergosip"),
    ("panik", "takut"),
    ("cape", "capek"),
    ("capekkk", "capek"),
    ("pusinggg", "pusing"),
    ("skuy", "ayo"),
    ("gas", "ayo"),
    ("gaskeun", "ayo"),
    ("gaspol", "ayo"),
    ("mantul", "bagus"),
    ("uhuy", "mantap"),
    ("mantab", "mantap"),
    ("kocak", "lucu"),
    ("ngeri", "hebat"),
    ("goks", "hebat"),
    ("pecah", "seru"),
    ("receh", "tidak penting"),
    ("lebay", "berlebihan"),
    ("php", "pemberi harapan palsu"),
    ("auto", "langsung"),
    ("halu", "berkhayal"),
    // gambling jargon
    ("judol", "judi online"),
    ("pinjol", "pinjaman online"),
    ("min", "minimal"),
    ("jp", "jackpot"),
    ("jepe", "jackpot"),
    ("jepey", "jackpot"),
    ("jekpot", "jackpot"),
    ("bonus", "hadiah"),
    ("depo", "deposit"),
    ("wd", "withdraw"),
    ("bet", "banget"),
    ("gmpng", "mudah"),
    ("gampang", "mudah"),
    ("win", "menang"),
    ("betting", "taruhan"),
    ("slot", "permainan judi"),
    ("event", "acara"),
    ("promo", "promosi"),
    ("gacr", "gacor"),
    ("gcr", "gacor"),
    ("gacir", "gacor"),
    ("mekswin", "maxwin"),
];
