//! The fixed query families run against the `quicc_alerts` table.
//!
//! Every count query starts with [`COUNT_SELECT`] and accepts an optional
//! `additionalSelect` fragment, which is either absent or [`MIN_MAX_DATE_SQL`].

use super::QueryTemplate;

/// Leading projection shared by the count queries.
pub const COUNT_SELECT: &str = "SELECT COUNT(pt.*) AS value";

/// Extra aggregation requested by `alertQuery`.
pub const MIN_MAX_DATE_SQL: &str = ", MIN(date) as min_date, MAX(date) as max_date ";

/// Alerts inside an arbitrary GeoJSON geometry.
pub const WORLD: QueryTemplate = QueryTemplate::new(
    "world",
    r#"SELECT COUNT(pt.*) AS value
            {{{additionalSelect}}}
        FROM quicc_alerts pt
        WHERE pt.date >= '{{begin}}'::date
            AND pt.date <= '{{end}}'::date
            AND ST_INTERSECTS(
                ST_SetSRID(ST_GeomFromGeoJSON('{{geojson}}'), 4326), the_geom) "#,
);

/// Alerts inside a country (GADM level 0).
pub const ISO: QueryTemplate = QueryTemplate::new(
    "iso",
    r#"SELECT COUNT(pt.*) AS value
            {{{additionalSelect}}}
        FROM quicc_alerts pt,
            (SELECT * FROM gadm2_countries_simple
             WHERE iso = UPPER('{{iso}}')) as p
        WHERE ST_Intersects(pt.the_geom, p.the_geom)
            AND pt.date >= '{{begin}}'::date
            AND pt.date <= '{{end}}'::date "#,
);

/// Alerts inside a province (GADM level 1).
pub const ID1: QueryTemplate = QueryTemplate::new(
    "id1",
    r#"SELECT COUNT(pt.*) AS value
            {{{additionalSelect}}}
        FROM quicc_alerts pt,
            (SELECT * FROM gadm2_provinces_simple
             WHERE iso = UPPER('{{iso}}') AND id_1 = {{id1}}) as p
        WHERE ST_Intersects(pt.the_geom, p.the_geom)
            AND pt.date >= '{{begin}}'::date
            AND pt.date <= '{{end}}'::date "#,
);

/// Alerts inside one polygon of a land-use table; `useTable` must be a
/// fragment from [`UseTable`](crate::alerts::UseTable).
pub const USE: QueryTemplate = QueryTemplate::new(
    "use",
    r#"SELECT COUNT(pt.*) AS value
            {{{additionalSelect}}}
        FROM quicc_alerts pt,
            (SELECT * FROM {{{useTable}}} WHERE cartodb_id = {{pid}}) as p
        WHERE ST_Intersects(pt.the_geom, p.the_geom)
            AND pt.date >= '{{begin}}'::date
            AND pt.date <= '{{end}}'::date "#,
);

/// Alerts inside a protected area. Marine areas are excluded and large
/// geometries are thinned before the intersection.
pub const WDPA: QueryTemplate = QueryTemplate::new(
    "wdpa",
    r#"SELECT COUNT(pt.*) AS value
            {{{additionalSelect}}}
        FROM quicc_alerts pt,
            (SELECT CASE when marine::numeric = 2 then null
        when ST_NPoints(the_geom)<=18000 THEN the_geom
       WHEN ST_NPoints(the_geom) BETWEEN 18000 AND 50000 THEN ST_RemoveRepeatedPoints(the_geom, 0.001)
      ELSE ST_RemoveRepeatedPoints(the_geom, 0.005)
       END as the_geom FROM wdpa_protected_areas where wdpaid={{wdpaid}}) as p
        WHERE ST_Intersects(pt.the_geom, p.the_geom)
            AND pt.date >= '{{begin}}'::date
            AND pt.date <= '{{end}}'::date  "#,
);

/// Most recent distinct alert dates.
pub const LATEST: QueryTemplate = QueryTemplate::new(
    "latest",
    r#"SELECT DISTINCT date
        FROM quicc_alerts
        WHERE date IS NOT NULL
        ORDER BY date DESC
        LIMIT {{limit}}"#,
);
