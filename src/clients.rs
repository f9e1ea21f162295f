#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error("A '{element}' element was not closed before the end of the document")]
    Unterminated { element: String },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Options {
    /// The name of the element holding a single client, whose children are its fields.
    pub record_element: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            record_element: "cliente".into(),
        }
    }
}

pub(crate) mod function {
    use crate::clients::{Error, Options};
    use crate::ClientRecord;
    use quick_xml::events::Event;

    /// Read all clients from the XML export in `xml_data`, in document order.
    ///
    /// Each child element of a record element becomes a field named like the element,
    /// with its text as value.
    pub fn read_clients(
        xml_data: impl std::io::BufRead,
        Options { record_element }: Options,
    ) -> Result<Vec<ClientRecord>, Error> {
        let mut reader = quick_xml::Reader::from_reader(xml_data);
        reader.trim_text(true);

        let mut clients = Vec::new();
        let mut buf = Vec::new();
        let mut current = None::<ClientRecord>;
        let mut field = None::<Field>;
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    if let Some(field) = field.as_mut() {
                        field.nesting += 1;
                    } else if current.is_some() {
                        field = Some(Field {
                            name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                            value: String::new(),
                            nesting: 0,
                        });
                    } else if e.name().as_ref() == record_element.as_bytes() {
                        current = Some(ClientRecord::default());
                    }
                }
                Event::Empty(e) => {
                    if let (Some(client), None) = (current.as_mut(), field.as_ref()) {
                        client.insert_raw(String::from_utf8_lossy(e.name().as_ref()), "");
                    }
                }
                Event::Text(e) => {
                    if let Some(field) = field.as_mut().filter(|f| f.nesting == 0) {
                        field.value.push_str(&e.unescape()?);
                    }
                }
                Event::CData(e) => {
                    if let Some(field) = field.as_mut().filter(|f| f.nesting == 0) {
                        field.value.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::End(e) => {
                    if let Some(field) = field.as_mut().filter(|f| f.nesting > 0) {
                        field.nesting -= 1;
                    } else if let Some(Field { name, value, .. }) = field.take() {
                        if let Some(client) = current.as_mut() {
                            client.insert_raw(name, value);
                        }
                    } else if e.name().as_ref() == record_element.as_bytes() {
                        clients.extend(current.take());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if current.is_some() {
            return Err(Error::Unterminated {
                element: record_element,
            });
        }
        Ok(clients)
    }

    /// A field of the current client while its text is being collected.
    struct Field {
        name: String,
        value: String,
        /// How many elements deep we are inside the field, whose text is ignored.
        nesting: usize,
    }
}
