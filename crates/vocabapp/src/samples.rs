use crate::model::NewWord;

/// (original, pronunciation, translation, example)
const SAMPLES: [(&str, &str, &str, &str); 8] = [
    ("勉強", "べんきょう", "學習", "毎日日本語を勉強しています。"),
    ("友達", "ともだち", "朋友", "友達と一緒に映画を見ました。"),
    ("美味しい", "おいしい", "好吃的", "この料理はとても美味しいです。"),
    ("図書館", "としょかん", "圖書館", "図書館で本を借りました。"),
    ("電車", "でんしゃ", "電車", "電車で学校に行きます。"),
    ("天気", "てんき", "天氣", "今日の天気はとてもいいです。"),
    ("買い物", "かいもの", "購物", "週末に買い物に行きます。"),
    ("仕事", "しごと", "工作", "新しい仕事を始めました。"),
];

/// A small Japanese → Chinese starter set for trying the app out.
pub fn sample_words() -> Vec<NewWord> {
    SAMPLES
        .iter()
        .map(|(original, pronunciation, translation, example)| {
            NewWord::from_fields(*original, *pronunciation, *translation, *example)
        })
        .collect()
}
