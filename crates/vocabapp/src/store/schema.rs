/// SQL to run once in the hosted service's SQL editor before using the
/// remote backend. Creates the `words` table, its indexes, the row-level
/// security policies that scope rows to their owner, and the trigger that
/// keeps `updated_at` current.
pub const CREATE_TABLE_SQL: &str = r#"-- Vocabulary table, one row per word, isolated per user
CREATE TABLE IF NOT EXISTS words (
  id BIGSERIAL PRIMARY KEY,
  user_id UUID REFERENCES auth.users(id) ON DELETE CASCADE,
  original_text TEXT NOT NULL,
  pronunciation TEXT,
  translation TEXT NOT NULL,
  example TEXT,
  is_favorite BOOLEAN DEFAULT FALSE,
  created_at TIMESTAMPTZ DEFAULT NOW(),
  updated_at TIMESTAMPTZ DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_words_user_id ON words(user_id);
CREATE INDEX IF NOT EXISTS idx_words_updated_at ON words(updated_at DESC);
CREATE INDEX IF NOT EXISTS idx_words_pronunciation ON words(pronunciation);
CREATE INDEX IF NOT EXISTS idx_words_translation ON words(translation);
CREATE INDEX IF NOT EXISTS idx_words_original_text ON words(original_text);

ALTER TABLE words ENABLE ROW LEVEL SECURITY;

CREATE POLICY "Users can only access their own words" ON words
  FOR ALL USING (auth.uid() = user_id);

CREATE POLICY "Users can only insert their own words" ON words
  FOR INSERT WITH CHECK (auth.uid() = user_id);

CREATE OR REPLACE FUNCTION update_updated_at_column()
RETURNS TRIGGER AS $$
BEGIN
  NEW.updated_at = NOW();
  RETURN NEW;
END;
$$ language 'plpgsql';

CREATE TRIGGER update_words_updated_at
  BEFORE UPDATE ON words
  FOR EACH ROW
  EXECUTE FUNCTION update_updated_at_column();
"#;

pub fn create_table_sql() -> &'static str {
    CREATE_TABLE_SQL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::remote::WORDS_TABLE;

    #[test]
    fn test_schema_matches_backend_columns() {
        let sql = create_table_sql();
        assert!(sql.contains(&format!("CREATE TABLE IF NOT EXISTS {}", WORDS_TABLE)));
        for column in [
            "user_id",
            "original_text",
            "pronunciation",
            "translation",
            "example",
            "is_favorite",
            "created_at",
            "updated_at",
        ] {
            assert!(sql.contains(column), "missing column {column}");
        }
        assert!(sql.contains("ENABLE ROW LEVEL SECURITY"));
    }
}
