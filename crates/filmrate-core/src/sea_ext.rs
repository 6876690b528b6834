use sea_orm::ColumnTrait;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};

/// Escape `%`, `_` and `\` so user input matches literally inside a LIKE pattern.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// `LOWER(col) LIKE '%needle%'`, case-insensitive substring match.
pub fn contains_ci<C: ColumnTrait>(col: C, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col((col.entity_name(), col))))
        .like(LikeExpr::new(pattern).escape('\\'))
}
