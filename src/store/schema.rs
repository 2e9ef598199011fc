pub const SCHEMA: &str = "
CREATE TABLE weathers (
    id integer primary key autoincrement not null,
    area varchar not null,
    date datetime not null,
    hour integer not null,
    temperature float not null,
    precipitation float,
    wind_speed float,
    wind_direction varchar,
    created_at datetime not null,
    unique(area, date)
);
CREATE INDEX idx_weathers_date ON weathers (date);
";

pub const INSERT_OBSERVATION: &str = "
INSERT INTO weathers
    (area, date, hour, temperature, precipitation, wind_speed, wind_direction, created_at)
    VALUES
    (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
";

pub const SELECT_RANGE: &str = "
SELECT id, area, date, hour, temperature, precipitation, wind_speed, wind_direction, created_at
FROM weathers
WHERE date BETWEEN ?1 AND ?2
ORDER BY date
";

pub const COUNT_OBSERVATIONS: &str = "SELECT COUNT(*) FROM weathers";
