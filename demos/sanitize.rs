//! Sanitize statements for every dialect without a database.
//!
//! Run with: cargo run --example sanitize -- mysql "SELECT * FROM t WHERE a = 'x'"

use sea_orm_sql_tracing::{resolve, Dialect};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    if let (Some(dialect), Some(sql)) = (args.next(), args.next()) {
        println!("{}", resolve(&dialect)?.sanitize(&sql));
        return Ok(());
    }

    let samples = [
        (Dialect::Mysql, r"INSERT INTO `users` VALUES ('foo', 'b\'ar', 42)"),
        (
            Dialect::Postgres,
            r#"SELECT "users".* FROM "users" WHERE "users"."id" IN ($1, $2, $3) [["id", 1], ["id", 2], ["id", 3]]"#,
        ),
        (
            Dialect::SqlServer,
            "EXEC sp_executesql N'SELECT TOP (1) [users].* FROM [users] WHERE [users].[age] > 30', N'@P1 int', 30",
        ),
        (
            Dialect::Sqlite,
            r#"SELECT  "posts".* FROM "posts" WHERE "posts"."title" = 'hello'  LIMIT 10"#,
        ),
    ];

    for (dialect, sql) in samples {
        let sanitizer = resolve(dialect.as_str())?;
        println!("{dialect:>10}: {sql}");
        println!("{:>10}  {}", "", sanitizer.sanitize(sql));
    }

    Ok(())
}
