//! System-descriptor parsing: blocks and lines

use indexmap::IndexMap;
use tracelink_markup::Element;

use crate::model::{Block, Connection, Endpoint, DEFAULT_POSITION};

/// Parse one system descriptor into the running block/connection sets
///
/// Returns the number of lines or branches skipped for unparseable
/// endpoints (non-fatal, for diagnostics).
pub(crate) fn parse_system(
    root: &Element,
    system_name: &str,
    blocks: &mut IndexMap<String, Block>,
    connections: &mut Vec<Connection>,
) -> usize {
    for element in root.find_descendants("Block") {
        if let Some(block) = parse_block(element, system_name) {
            tracing::debug!(
                sid = %block.sid,
                name = %block.name,
                block_type = %block.block_type,
                system = %system_name,
                "found block"
            );
            blocks.insert(block.sid.clone(), block);
        }
    }

    let mut skipped = 0;
    for line in root.find_descendants("Line") {
        skipped += parse_line(line, connections);
    }
    skipped
}

fn parse_block(element: &Element, system_name: &str) -> Option<Block> {
    let sid = element.attr("SID")?.to_string();
    let name = element.attr("Name").unwrap_or_default().to_string();
    let block_type = element.attr("BlockType").unwrap_or_default().to_string();

    let position = element
        .find_descendants("P")
        .find(|p| p.attr("Name") == Some("Position"))
        .and_then(|p| p.text())
        .and_then(parse_position)
        .unwrap_or(DEFAULT_POSITION);

    let mut properties = IndexMap::new();
    for prop in element.find_descendants("P") {
        let Some(prop_name) = prop.attr("Name") else {
            continue;
        };
        if prop_name == "Position" || prop_name == "ZOrder" {
            continue;
        }
        properties.insert(
            prop_name.to_string(),
            prop.text().unwrap_or_default().to_string(),
        );
    }

    let (input_ports, output_ports) = element
        .find_descendants("PortCounts")
        .next()
        .map(|ports| {
            let parse = |key: &str| {
                ports
                    .attr(key)
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0u32)
            };
            (parse("in"), parse("out"))
        })
        .unwrap_or((0, 0));

    Some(Block {
        sid,
        name,
        block_type,
        position,
        properties,
        parent_system: system_name.to_string(),
        input_ports,
        output_ports,
    })
}

/// Parse `[x, y, w, h]` position text; any deviation falls back to the
/// caller's default
fn parse_position(text: &str) -> Option<(i32, i32, i32, i32)> {
    let inner = text.trim().trim_start_matches('[').trim_end_matches(']');
    let parts: Vec<i32> = inner
        .split(',')
        .map(|part| part.trim().parse())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [x, y, w, h] => Some((*x, *y, *w, *h)),
        _ => None,
    }
}

/// Parse one line element into its connections
///
/// Endpoint sub-elements are resolved with **direct-child** lookup so a
/// branch's destination never shadows the line's own. Each branch adds
/// a connection reusing the line's source endpoint. Returns the count
/// of skipped (unparseable) endpoints.
fn parse_line(line: &Element, connections: &mut Vec<Connection>) -> usize {
    let Some(src_text) = line
        .child_with_attr("P", "Name", "Src")
        .and_then(|p| p.text())
    else {
        return 0;
    };
    let signal_name = line
        .child_with_attr("P", "Name", "Name")
        .and_then(|p| p.text())
        .map(str::to_string);

    let Some(source) = Endpoint::parse(src_text) else {
        tracing::debug!(endpoint = %src_text, "skipping line with unparseable source");
        return 1;
    };

    let mut skipped = 0;

    if let Some(dst_text) = line
        .child_with_attr("P", "Name", "Dst")
        .and_then(|p| p.text())
    {
        match Endpoint::parse(dst_text) {
            Some(dest) => {
                connections.push(connection(&source, &dest, signal_name.clone()));
            }
            None => {
                tracing::debug!(endpoint = %dst_text, "skipping unparseable destination");
                skipped += 1;
            }
        }
    }

    for branch in line.children_named("Branch") {
        let Some(branch_text) = branch
            .child_with_attr("P", "Name", "Dst")
            .and_then(|p| p.text())
        else {
            continue;
        };
        match Endpoint::parse(branch_text) {
            Some(dest) => {
                connections.push(connection(&source, &dest, signal_name.clone()));
            }
            None => {
                tracing::debug!(endpoint = %branch_text, "skipping unparseable branch destination");
                skipped += 1;
            }
        }
    }

    skipped
}

fn connection(source: &Endpoint, dest: &Endpoint, signal_name: Option<String>) -> Connection {
    Connection {
        source_block: source.sid.clone(),
        source_port: source.port,
        dest_block: dest.sid.clone(),
        dest_port: dest.port,
        signal_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(xml: &str) -> (IndexMap<String, Block>, Vec<Connection>, usize) {
        let root = Element::parse_str(xml).unwrap();
        let mut blocks = IndexMap::new();
        let mut connections = Vec::new();
        let skipped = parse_system(&root, "system_root", &mut blocks, &mut connections);
        (blocks, connections, skipped)
    }

    #[test]
    fn block_with_position_and_properties() {
        let (blocks, _, _) = run(
            r#"<System>
                 <Block BlockType="Gain" Name="K" SID="5">
                   <P Name="Position">[100, 50, 130, 80]</P>
                   <P Name="ZOrder">3</P>
                   <P Name="Gain">2.5</P>
                 </Block>
               </System>"#,
        );
        let block = &blocks["5"];
        assert_eq!(block.position, (100, 50, 130, 80));
        assert_eq!(block.parent_system, "system_root");
        assert_eq!(block.properties.len(), 1);
        assert_eq!(block.properties["Gain"], "2.5");
    }

    #[test]
    fn malformed_position_falls_back_to_default() {
        let (blocks, _, _) = run(
            r#"<System>
                 <Block BlockType="Sum" Name="Add" SID="6">
                   <P Name="Position">not a rectangle</P>
                 </Block>
               </System>"#,
        );
        assert_eq!(blocks["6"].position, DEFAULT_POSITION);
    }

    #[test]
    fn missing_position_uses_default() {
        let (blocks, _, _) = run(r#"<System><Block BlockType="Inport" Name="In1" SID="1"/></System>"#);
        assert_eq!(blocks["1"].position, DEFAULT_POSITION);
    }

    #[test]
    fn port_counts_default_to_zero() {
        let (blocks, _, _) = run(
            r#"<System>
                 <Block BlockType="Sum" Name="Add" SID="2">
                   <PortCounts in="2" out="1"/>
                 </Block>
                 <Block BlockType="Inport" Name="In1" SID="3"/>
               </System>"#,
        );
        assert_eq!((blocks["2"].input_ports, blocks["2"].output_ports), (2, 1));
        assert_eq!((blocks["3"].input_ports, blocks["3"].output_ports), (0, 0));
    }

    #[test]
    fn simple_line_yields_one_connection() {
        let (_, connections, skipped) = run(
            r#"<System>
                 <Line>
                   <P Name="Name">speed</P>
                   <P Name="Src">1#out:1</P>
                   <P Name="Dst">2#in:1</P>
                 </Line>
               </System>"#,
        );
        assert_eq!(skipped, 0);
        assert_eq!(
            connections,
            vec![Connection {
                source_block: "1".to_string(),
                source_port: 1,
                dest_block: "2".to_string(),
                dest_port: 1,
                signal_name: Some("speed".to_string()),
            }]
        );
    }

    #[test]
    fn branches_fan_out_from_the_same_source() {
        let (_, connections, skipped) = run(
            r#"<System>
                 <Line>
                   <P Name="Src">10#out:1</P>
                   <Branch><P Name="Dst">20#in:1</P></Branch>
                   <Branch><P Name="Dst">30#in:1</P></Branch>
                 </Line>
               </System>"#,
        );
        assert_eq!(skipped, 0);
        assert_eq!(connections.len(), 2);
        for conn in &connections {
            assert_eq!(conn.source_block, "10");
            assert_eq!(conn.source_port, 1);
        }
        assert_eq!(connections[0].dest_block, "20");
        assert_eq!(connections[1].dest_block, "30");
    }

    #[test]
    fn branch_destination_does_not_shadow_line_destination() {
        // The line itself has no Dst; only the branch does. A subtree
        // search would wrongly promote the branch Dst onto the line.
        let (_, connections, _) = run(
            r#"<System>
                 <Line>
                   <P Name="Src">1#out:1</P>
                   <Branch><P Name="Dst">2#in:1</P></Branch>
                 </Line>
               </System>"#,
        );
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].dest_block, "2");
    }

    #[test]
    fn state_endpoint_connects_at_port_zero() {
        let (_, connections, _) = run(
            r#"<System>
                 <Line>
                   <P Name="Src">4#state</P>
                   <P Name="Dst">5#in:2</P>
                 </Line>
               </System>"#,
        );
        assert_eq!(connections[0].source_block, "4");
        assert_eq!(connections[0].source_port, 0);
    }

    #[test]
    fn unparseable_endpoints_are_skipped_and_counted() {
        let (_, connections, skipped) = run(
            r#"<System>
                 <Line>
                   <P Name="Src">bogus</P>
                   <P Name="Dst">2#in:1</P>
                 </Line>
                 <Line>
                   <P Name="Src">1#out:1</P>
                   <P Name="Dst">nonsense</P>
                   <Branch><P Name="Dst">3#in:1</P></Branch>
                 </Line>
               </System>"#,
        );
        // First line dies on its source; second loses its primary
        // destination but keeps the branch connection
        assert_eq!(skipped, 2);
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].dest_block, "3");
    }
}
